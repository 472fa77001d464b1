//! CSV over HTTP, e.g. a spreadsheet published with `output=csv`.

use sladesk_core::{
    error::{SlaError, SlaResult},
    source::{read_csv, RawTable, TicketSource},
};
use std::time::Duration;

pub struct HttpCsvSource {
    url:     String,
    timeout: Duration,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>, timeout_secs: u64) -> Self {
        Self {
            url:     url.into(),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    fn fetch_error(&self, message: impl ToString) -> SlaError {
        SlaError::Fetch {
            source_name: self.url.clone(),
            message: message.to_string(),
        }
    }
}

impl TicketSource for HttpCsvSource {
    fn name(&self) -> String {
        self.url.clone()
    }

    fn fetch(&self) -> SlaResult<RawTable> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| self.fetch_error(e))?;

        let resp = client.get(&self.url).send().map_err(|e| self.fetch_error(e))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(self.fetch_error(format!("HTTP {}", status.as_u16())));
        }

        let body = resp.text().map_err(|e| self.fetch_error(e))?;
        log::debug!("fetched {} bytes from {}", body.len(), self.url);
        read_csv(body.as_bytes())
    }
}
