//! Gandi `GandiApi` trait implementation

use async_trait::async_trait;

use crate::error::Result;
use crate::traits::{ApiErrorMapper, GandiApi};
use crate::types::{RecordInfo, RecordSpec, VersionInfo, ZoneInfo, ZoneSummary};
use crate::xmlrpc::Value;

use super::GandiClient;

const ZONE_LIST: &str = "domain.zone.list";
const ZONE_INFO: &str = "domain.zone.info";
const ZONE_CREATE: &str = "domain.zone.create";
const ZONE_DELETE: &str = "domain.zone.delete";
const VERSION_LIST: &str = "domain.zone.version.list";
const VERSION_NEW: &str = "domain.zone.version.new";
const VERSION_DELETE: &str = "domain.zone.version.delete";
const VERSION_SET: &str = "domain.zone.version.set";
const RECORD_LIST: &str = "domain.zone.record.list";
const RECORD_ADD: &str = "domain.zone.record.add";
const RECORD_UPDATE: &str = "domain.zone.record.update";
const RECORD_DELETE: &str = "domain.zone.record.delete";

impl GandiClient {
    fn require_i64(&self, method: &str, value: &Value, field: &str) -> Result<i64> {
        value
            .get(field)
            .and_then(Value::as_i64)
            .ok_or_else(|| self.parse_error(method, format!("missing integer field '{field}'")))
    }

    fn require_str(&self, method: &str, value: &Value, field: &str) -> Result<String> {
        value
            .get(field)
            .and_then(Value::as_str)
            .map(str::to_string)
            .ok_or_else(|| self.parse_error(method, format!("missing string field '{field}'")))
    }

    fn require_array<'a>(&self, method: &str, value: &'a Value) -> Result<&'a [Value]> {
        value
            .as_array()
            .ok_or_else(|| self.parse_error(method, "expected an array"))
    }

    fn require_bool(&self, method: &str, value: &Value) -> Result<bool> {
        value
            .as_bool()
            .ok_or_else(|| self.parse_error(method, "expected a boolean"))
    }

    /// Convert a `domain.zone.info` struct into a [`ZoneInfo`]
    pub(crate) fn value_to_zone_info(&self, method: &str, value: &Value) -> Result<ZoneInfo> {
        let versions = match value.get("versions").and_then(Value::as_array) {
            Some(items) => items
                .iter()
                .map(|v| {
                    v.as_i64()
                        .ok_or_else(|| self.parse_error(method, "non-integer version number"))
                })
                .collect::<Result<Vec<_>>>()?,
            None => Vec::new(),
        };

        Ok(ZoneInfo {
            id: self.require_i64(method, value, "id")?,
            name: self.require_str(method, value, "name")?,
            version: value.get("version").and_then(Value::as_i64).unwrap_or(0),
            versions,
            domains: value.get("domains").and_then(Value::as_i64).unwrap_or(0),
            public: value
                .get("public")
                .and_then(Value::as_bool)
                .unwrap_or(false),
            date_updated: value.get("date_updated").and_then(Value::as_datetime),
        })
    }

    /// Convert a `domain.zone.record.*` struct into a [`RecordInfo`]
    pub(crate) fn value_to_record(&self, method: &str, value: &Value) -> Result<RecordInfo> {
        Ok(RecordInfo {
            id: self.require_i64(method, value, "id")?,
            name: self.require_str(method, value, "name")?,
            record_type: self.require_str(method, value, "type")?,
            value: self.require_str(method, value, "value")?,
            ttl: value.get("ttl").and_then(Value::as_i64).unwrap_or(0),
        })
    }

    fn record_spec_to_value(record: &RecordSpec) -> Value {
        Value::structure([
            ("name", Value::from(record.name.as_str())),
            ("type", Value::from(record.record_type.as_str())),
            ("value", Value::from(record.value.as_str())),
            ("ttl", Value::from(record.ttl)),
        ])
    }
}

#[async_trait]
impl GandiApi for GandiClient {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn zone_list(&self) -> Result<Vec<ZoneSummary>> {
        let value = self.call(ZONE_LIST, Vec::new()).await?;
        self.require_array(ZONE_LIST, &value)?
            .iter()
            .map(|z| {
                Ok(ZoneSummary {
                    id: self.require_i64(ZONE_LIST, z, "id")?,
                    name: self.require_str(ZONE_LIST, z, "name")?,
                    version: z.get("version").and_then(Value::as_i64).unwrap_or(0),
                    public: z.get("public").and_then(Value::as_bool).unwrap_or(false),
                })
            })
            .collect()
    }

    async fn zone_info(&self, zone_id: i64) -> Result<ZoneInfo> {
        let value = self.call(ZONE_INFO, vec![Value::from(zone_id)]).await?;
        self.value_to_zone_info(ZONE_INFO, &value)
    }

    async fn zone_create(&self, name: &str) -> Result<ZoneInfo> {
        let params = Value::structure([("name", Value::from(name))]);
        let value = self.call(ZONE_CREATE, vec![params]).await?;
        self.value_to_zone_info(ZONE_CREATE, &value)
    }

    async fn zone_delete(&self, zone_id: i64) -> Result<bool> {
        let value = self.call(ZONE_DELETE, vec![Value::from(zone_id)]).await?;
        self.require_bool(ZONE_DELETE, &value)
    }

    async fn version_list(&self, zone_id: i64) -> Result<Vec<VersionInfo>> {
        let value = self.call(VERSION_LIST, vec![Value::from(zone_id)]).await?;
        self.require_array(VERSION_LIST, &value)?
            .iter()
            .map(|v| {
                Ok(VersionInfo {
                    id: self.require_i64(VERSION_LIST, v, "id")?,
                    date_created: v.get("date_created").and_then(Value::as_datetime),
                })
            })
            .collect()
    }

    async fn version_new(&self, zone_id: i64, base_version: i64) -> Result<i64> {
        let value = self
            .call(
                VERSION_NEW,
                vec![Value::from(zone_id), Value::from(base_version)],
            )
            .await?;
        value
            .as_i64()
            .ok_or_else(|| self.parse_error(VERSION_NEW, "expected the new version number"))
    }

    async fn version_delete(&self, zone_id: i64, version: i64) -> Result<bool> {
        let value = self
            .call(
                VERSION_DELETE,
                vec![Value::from(zone_id), Value::from(version)],
            )
            .await?;
        self.require_bool(VERSION_DELETE, &value)
    }

    async fn version_set(&self, zone_id: i64, version: i64) -> Result<bool> {
        let value = self
            .call(VERSION_SET, vec![Value::from(zone_id), Value::from(version)])
            .await?;
        self.require_bool(VERSION_SET, &value)
    }

    async fn record_list(&self, zone_id: i64, version: i64) -> Result<Vec<RecordInfo>> {
        let value = self
            .call(RECORD_LIST, vec![Value::from(zone_id), Value::from(version)])
            .await?;
        self.require_array(RECORD_LIST, &value)?
            .iter()
            .map(|r| self.value_to_record(RECORD_LIST, r))
            .collect()
    }

    async fn record_add(
        &self,
        zone_id: i64,
        version: i64,
        record: &RecordSpec,
    ) -> Result<RecordInfo> {
        let value = self
            .call(
                RECORD_ADD,
                vec![
                    Value::from(zone_id),
                    Value::from(version),
                    Self::record_spec_to_value(record),
                ],
            )
            .await?;
        self.value_to_record(RECORD_ADD, &value)
    }

    async fn record_update(
        &self,
        zone_id: i64,
        version: i64,
        record_id: i64,
        record: &RecordSpec,
    ) -> Result<Vec<RecordInfo>> {
        let value = self
            .call(
                RECORD_UPDATE,
                vec![
                    Value::from(zone_id),
                    Value::from(version),
                    Value::structure([("id", Value::from(record_id))]),
                    Self::record_spec_to_value(record),
                ],
            )
            .await?;
        self.require_array(RECORD_UPDATE, &value)?
            .iter()
            .map(|r| self.value_to_record(RECORD_UPDATE, r))
            .collect()
    }

    async fn record_delete(&self, zone_id: i64, version: i64, record_id: i64) -> Result<bool> {
        let value = self
            .call(
                RECORD_DELETE,
                vec![
                    Value::from(zone_id),
                    Value::from(version),
                    Value::structure([("id", Value::from(record_id))]),
                ],
            )
            .await?;
        // Gandi answers with the number of deleted records
        let deleted = value
            .as_i64()
            .ok_or_else(|| self.parse_error(RECORD_DELETE, "expected a deleted count"))?;
        Ok(deleted > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SystemType;
    use crate::xmlrpc::{Response, parse_response};

    fn client() -> GandiClient {
        GandiClient::new("key".to_string(), SystemType::Testing)
    }

    fn decode(xml: &str) -> Value {
        match parse_response(xml) {
            Ok(Response::Success(v)) => v,
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn zone_info_conversion() {
        let value = decode(
            "<methodResponse><params><param><value><struct>\
             <member><name>id</name><value><int>1234</int></value></member>\
             <member><name>name</name><value><string>example zone</string></value></member>\
             <member><name>version</name><value><int>3</int></value></member>\
             <member><name>versions</name><value><array><data>\
               <value><int>1</int></value><value><int>2</int></value><value><int>3</int></value>\
             </data></array></value></member>\
             <member><name>domains</name><value><int>1</int></value></member>\
             <member><name>public</name><value><boolean>0</boolean></value></member>\
             </struct></value></param></params></methodResponse>",
        );
        let zone = client().value_to_zone_info(ZONE_INFO, &value).unwrap();
        assert_eq!(zone.id, 1234);
        assert_eq!(zone.name, "example zone");
        assert_eq!(zone.version, 3);
        assert_eq!(zone.versions, vec![1, 2, 3]);
        assert_eq!(zone.domains, 1);
        assert!(!zone.public);
        assert!(zone.date_updated.is_none());
    }

    #[test]
    fn zone_info_missing_id_is_parse_error() {
        let value = Value::structure([("name", Value::from("z"))]);
        let err = client().value_to_zone_info(ZONE_INFO, &value).unwrap_err();
        assert!(err.to_string().contains("missing integer field 'id'"));
    }

    #[test]
    fn record_conversion() {
        let value = Value::structure([
            ("id", Value::from(99)),
            ("name", Value::from("www")),
            ("type", Value::from("TXT")),
            ("value", Value::from("\"hello\"")),
            ("ttl", Value::from(10800)),
        ]);
        let record = client().value_to_record(RECORD_LIST, &value).unwrap();
        assert_eq!(
            record,
            RecordInfo {
                id: 99,
                name: "www".to_string(),
                record_type: "TXT".to_string(),
                value: "\"hello\"".to_string(),
                ttl: 10800,
            }
        );
    }

    #[test]
    fn record_spec_encoding() {
        let spec = RecordSpec {
            name: "testa".to_string(),
            record_type: "A".to_string(),
            value: "1.1.1.1".to_string(),
            ttl: 2000,
        };
        let value = GandiClient::record_spec_to_value(&spec);
        assert_eq!(value.get("type").and_then(Value::as_str), Some("A"));
        assert_eq!(value.get("ttl").and_then(Value::as_i64), Some(2000));
    }
}
