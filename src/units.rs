use serde::Serialize;
use std::sync::Arc;

use crate::client::ApiClient;
use crate::dto::UnitList;
use crate::error::Result;

/// Unit catalog endpoints: `/units/...`.
#[derive(Debug, Clone)]
pub struct UnitsResource {
    pub(crate) api: Arc<ApiClient>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitExternalId<'a> {
    external_id: &'a str,
}

#[derive(Serialize)]
struct ByIds<'a> {
    items: Vec<UnitExternalId<'a>>,
}

impl UnitsResource {
    pub(crate) fn new(api: Arc<ApiClient>) -> Self {
        Self { api }
    }

    /// The full unit catalog.
    pub fn list(&self) -> Result<UnitList> {
        self.api.get_json("/units", "")
    }

    /// Looks up units by external id, e.g. a time series's `unitExternalId`.
    pub fn retrieve<S: AsRef<str>>(&self, external_ids: &[S]) -> Result<UnitList> {
        let body = ByIds {
            items: external_ids
                .iter()
                .map(|id| UnitExternalId {
                    external_id: id.as_ref(),
                })
                .collect(),
        };
        self.api.post_json("/units/byids", &body)
    }
}
