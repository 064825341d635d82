//! Gandi XML-RPC request method

use crate::error::Result;
use crate::http_client::HttpUtils;
use crate::traits::{ApiErrorMapper, RawApiError};
use crate::xmlrpc::{self, Response, Value};

use super::GandiClient;

impl GandiClient {
    /// Execute an XML-RPC call; the API key is prepended to `params`.
    pub(crate) async fn call(&self, method: &str, params: Vec<Value>) -> Result<Value> {
        let mut all_params = Vec::with_capacity(params.len() + 1);
        all_params.push(Value::from(self.api_key.as_str()));
        all_params.extend(params);

        let body = xmlrpc::encode_call(method, &all_params);

        let request = self
            .client
            .post(&self.endpoint)
            .header("Content-Type", "text/xml")
            .body(body);

        let response_text = HttpUtils::execute_request(request, method, &self.endpoint).await?;

        match HttpUtils::parse_xmlrpc(&response_text, method)? {
            Response::Success(value) => Ok(value),
            Response::Fault(fault) => {
                let err = self.map_error(method, RawApiError::with_code(fault.code, fault.message));
                if err.is_expected() {
                    log::warn!("[gandi] API fault: {err}");
                } else {
                    log::error!("[gandi] API fault: {err}");
                }
                Err(err)
            }
        }
    }
}
