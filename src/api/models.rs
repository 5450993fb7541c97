//! Typed API objects decoded from `*.get` results
//!
//! The API encodes most integers as strings; fields below accept either form.

use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseInt {
    Int(i64),
    Str(String),
}

impl LooseInt {
    fn into_i64<E: serde::de::Error>(self) -> Result<i64, E> {
        match self {
            LooseInt::Int(value) => Ok(value),
            LooseInt::Str(value) => value
                .trim()
                .parse()
                .map_err(|_| E::custom(format!("invalid integer: {:?}", value))),
        }
    }
}

fn loose_i32<'de, D>(deserializer: D) -> Result<i32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LooseInt::deserialize(deserializer)?.into_i64::<D::Error>()?;
    i32::try_from(value).map_err(serde::de::Error::custom)
}

/// Host as returned by `host.get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Host {
    pub hostid: String,

    /// Technical host name
    pub host: String,

    /// Visible name
    #[serde(default)]
    pub name: String,

    /// 0 = monitored, 1 = unmonitored
    #[serde(default, deserialize_with = "loose_i32")]
    pub status: i32,
}

/// Host group as returned by `hostgroup.get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostGroup {
    pub groupid: String,
    pub name: String,
}

/// Interface kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "i32", try_from = "i64")]
pub enum InterfaceType {
    Agent = 1,
    Snmp = 2,
    Ipmi = 3,
    Jmx = 4,
}

impl From<InterfaceType> for i32 {
    fn from(value: InterfaceType) -> Self {
        value as i32
    }
}

impl TryFrom<i64> for InterfaceType {
    type Error = String;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(InterfaceType::Agent),
            2 => Ok(InterfaceType::Snmp),
            3 => Ok(InterfaceType::Ipmi),
            4 => Ok(InterfaceType::Jmx),
            other => Err(format!("unknown interface type: {}", other)),
        }
    }
}

fn interface_type<'de, D>(deserializer: D) -> Result<InterfaceType, D::Error>
where
    D: Deserializer<'de>,
{
    let value = LooseInt::deserialize(deserializer)?.into_i64::<D::Error>()?;
    InterfaceType::try_from(value).map_err(serde::de::Error::custom)
}

/// Host interface as returned by `hostinterface.get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostInterface {
    pub hostid: String,
    pub interfaceid: String,

    #[serde(default)]
    pub dns: String,

    #[serde(default)]
    pub ip: String,

    /// 1 for the default interface of its type
    #[serde(deserialize_with = "loose_i32")]
    pub main: i32,

    pub port: String,

    #[serde(rename = "type", deserialize_with = "interface_type")]
    pub interface_type: InterfaceType,

    /// 1 = connect by IP, 0 = by DNS name
    #[serde(deserialize_with = "loose_i32")]
    pub useip: i32,
}

/// One history record as returned by `history.get`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryItem {
    pub itemid: String,
    pub clock: String,
    pub value: String,

    #[serde(default)]
    pub ns: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_host_interface_string_numbers() {
        let value = json!({
            "interfaceid": "1",
            "hostid": "10084",
            "main": "1",
            "type": "1",
            "useip": "1",
            "ip": "127.0.0.1",
            "dns": "",
            "port": "10050",
            "available": "1"
        });

        let iface: HostInterface = serde_json::from_value(value).unwrap();
        assert_eq!(iface.main, 1);
        assert_eq!(iface.interface_type, InterfaceType::Agent);
        assert_eq!(iface.port, "10050");
    }

    #[test]
    fn test_host_interface_json_numbers() {
        let value = json!({
            "interfaceid": "7",
            "hostid": "10500",
            "main": 1,
            "type": 2,
            "useip": 0,
            "dns": "switch01.example.com",
            "port": "161"
        });

        let iface: HostInterface = serde_json::from_value(value).unwrap();
        assert_eq!(iface.interface_type, InterfaceType::Snmp);
        assert_eq!(iface.useip, 0);
        assert_eq!(iface.ip, "");
    }

    #[test]
    fn test_unknown_interface_type() {
        let value = json!({
            "interfaceid": "7", "hostid": "1", "main": "1", "type": "9", "useip": "1", "port": "1"
        });

        assert!(serde_json::from_value::<HostInterface>(value).is_err());
    }

    #[test]
    fn test_interface_type_serializes_as_number() {
        assert_eq!(serde_json::to_value(InterfaceType::Jmx).unwrap(), json!(4));
    }

    #[test]
    fn test_host_defaults() {
        let host: Host = serde_json::from_value(json!({"hostid": "10084", "host": "Zabbix server"})).unwrap();
        assert_eq!(host.status, 0);
        assert_eq!(host.name, "");
    }
}
