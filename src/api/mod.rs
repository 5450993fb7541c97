//! Typed accessors layered over [`ApiCaller`]
//!
//! Each accessor fills in default `output`/`limit` parameters, calls
//! `call_with_error` and decodes the result list into typed objects.

pub mod models;

pub use models::{HistoryItem, Host, HostGroup, HostInterface, InterfaceType};

use crate::error::{Result, RpcError};
use crate::rpc::{ApiCaller, Params};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Default row limit applied when the caller sets none
const DEFAULT_LIMIT: &str = "100";

/// Default history value type (numeric float)
const DEFAULT_HISTORY: &str = "0";

/// Fill `output` and `limit` unless already present
pub fn with_defaults(mut params: Params) -> Params {
    params.entry("output").or_insert_with(|| Value::from("extend"));
    params.entry("limit").or_insert_with(|| Value::from(DEFAULT_LIMIT));
    params
}

/// Typed getters, available on every [`ApiCaller`]
#[async_trait]
pub trait ZabbixApi: ApiCaller {
    /// Call `method` and decode its result list
    async fn get_objects<T>(&self, method: &str, params: Params) -> Result<Vec<T>>
    where
        T: DeserializeOwned + Send,
    {
        let response = self.call_with_error(method, Value::Object(params)).await?;
        Ok(response.decode_result(method)?)
    }

    async fn hosts_get(&self, params: Params) -> Result<Vec<Host>> {
        self.get_objects("host.get", with_defaults(params)).await
    }

    /// Fetch exactly one host by id
    async fn host_get_by_id(&self, id: &str) -> Result<Host> {
        let mut params = Params::new();
        params.insert("hostids".to_string(), Value::from(id));

        let mut hosts = self.hosts_get(params).await?;
        if hosts.len() != 1 {
            return Err(RpcError::ExpectedOneResult(hosts.len()).into());
        }
        Ok(hosts.remove(0))
    }

    async fn host_groups_get(&self, params: Params) -> Result<Vec<HostGroup>> {
        self.get_objects("hostgroup.get", with_defaults(params)).await
    }

    /// Fetch host groups by id, failing unless every id was found
    async fn host_groups_get_by_ids(&self, ids: &[String]) -> Result<Vec<HostGroup>> {
        let mut params = Params::new();
        params.insert("groupids".to_string(), Value::from(ids.to_vec()));

        let groups = self.host_groups_get(params).await?;
        if groups.len() != ids.len() {
            return Err(RpcError::ExpectedMore {
                expected: ids.len(),
                got: groups.len(),
            }
            .into());
        }
        Ok(groups)
    }

    async fn host_interfaces_get(&self, params: Params) -> Result<Vec<HostInterface>> {
        self.get_objects("hostinterface.get", with_defaults(params)).await
    }

    /// `history.get`; the value type defaults to numeric float
    async fn history_get(&self, params: Params) -> Result<Vec<HistoryItem>> {
        let mut params = with_defaults(params);
        params.entry("history").or_insert_with(|| Value::from(DEFAULT_HISTORY));
        self.get_objects("history.get", params).await
    }
}

impl<T: ApiCaller> ZabbixApi for T {}
