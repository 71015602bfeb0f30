use crate::config::DashboardConfig;
use crate::error::{LoadError, MutationError};
use crate::types::{FileRecord, FileRecordPayload};
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::{debug, info};

const SUCCESS_STATUS: &str = "success";

/// The three backend calls the dashboard depends on.
pub trait FileBackend {
    fn fetch_files(&self) -> Result<Vec<FileRecord>, LoadError>;
    fn delete_file(&self, id: &str) -> Result<(), MutationError>;
    fn cleanup(&self) -> Result<(), MutationError>;
}

#[derive(Debug, Deserialize)]
struct FilesResponse {
    status: String,
    files: Map<String, Value>,
}

/// Decodes a `GET /files` body and flattens the id-keyed map into records,
/// keeping the map's order.
pub fn parse_files_response(body: &str) -> Result<Vec<FileRecord>, LoadError> {
    let response: FilesResponse =
        serde_json::from_str(body).map_err(|error| LoadError::Decode(error.to_string()))?;

    if response.status != SUCCESS_STATUS {
        return Err(LoadError::Status(response.status));
    }

    response
        .files
        .into_iter()
        .map(|(id, value)| {
            let payload: FileRecordPayload =
                serde_json::from_value(value).map_err(|error| LoadError::MalformedRecord {
                    id: id.clone(),
                    reason: error.to_string(),
                })?;
            Ok(FileRecord::from_payload(id, payload))
        })
        .collect()
}

pub fn file_info_path(id: &str) -> String {
    format!("/file/{id}/info")
}

#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(config: &DashboardConfig) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn file_info_url(&self, id: &str) -> String {
        self.endpoint(&file_info_path(id))
    }
}

impl FileBackend for HttpBackend {
    fn fetch_files(&self) -> Result<Vec<FileRecord>, LoadError> {
        let endpoint = self.endpoint("/files");
        debug!(%endpoint, "fetching file listing");

        let response = self
            .client
            .get(&endpoint)
            .send()
            .map_err(|error| LoadError::Transport(error.to_string()))?;
        let body = response
            .text()
            .map_err(|error| LoadError::Transport(error.to_string()))?;

        let records = parse_files_response(&body)?;
        info!(count = records.len(), "file listing fetched");
        Ok(records)
    }

    fn delete_file(&self, id: &str) -> Result<(), MutationError> {
        let endpoint = self.endpoint(&format!("/file/{id}"));
        let failed = |reason: String| MutationError::Delete {
            id: id.to_string(),
            reason,
        };

        let response = self
            .client
            .delete(&endpoint)
            .send()
            .map_err(|error| failed(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(failed(format!("server responded with {status}")));
        }
        Ok(())
    }

    fn cleanup(&self) -> Result<(), MutationError> {
        let response = self
            .client
            .post(self.endpoint("/cleanup"))
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|error| MutationError::Cleanup(error.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(MutationError::Cleanup(format!(
                "server responded with {status}"
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn flattens_files_map_in_wire_order() {
        let body = r#"{
            "status": "success",
            "files": {
                "zz99": {"filename": "last.exe", "file_size": 10},
                "aa11": {"filename": "first.dll", "has_static_analysis": true}
            }
        }"#;

        let records = parse_files_response(body).unwrap();
        let ids: Vec<&str> = records.iter().map(|record| record.id.as_str()).collect();
        assert_eq!(ids, vec!["zz99", "aa11"]);
        assert_eq!(records[0].file_size, Some(10));
        assert!(records[1].has_static_analysis);
    }

    #[test]
    fn non_success_status_is_a_load_error() {
        let err = parse_files_response(r#"{"status": "error", "files": {}}"#).unwrap_err();
        assert!(matches!(err, LoadError::Status(status) if status == "error"));
    }

    #[test]
    fn success_without_files_map_is_a_decode_error() {
        let err = parse_files_response(r#"{"status": "success"}"#).unwrap_err();
        assert!(matches!(err, LoadError::Decode(_)));
    }

    #[test]
    fn record_without_filename_is_malformed() {
        let body = r#"{"status": "success", "files": {"abc": {"file_size": 3}}}"#;
        let err = parse_files_response(body).unwrap_err();
        assert!(matches!(err, LoadError::MalformedRecord { id, .. } if id == "abc"));
    }

    #[test]
    fn undecodable_body_is_a_decode_error() {
        assert!(matches!(
            parse_files_response("<html>").unwrap_err(),
            LoadError::Decode(_)
        ));
    }

    #[test]
    fn builds_endpoints_from_base_url() {
        let config = DashboardConfig {
            base_url: "http://localhost:5000/".to_string(),
            ..DashboardConfig::default()
        };
        let backend = HttpBackend::new(&config).unwrap();
        assert_eq!(
            backend.file_info_url("d41d8c"),
            "http://localhost:5000/file/d41d8c/info"
        );
    }
}
