//! Mock Fabrick API server for testing
//!
//! A minimal HTTP/1.1 server on a random local port. Each route answers with
//! a scripted reply and every request is captured, so tests can assert on
//! the exact path, query, headers and body the client sent.
//!
//! Routes:
//! - GET  /api/gbs/banking/v4.0/accounts/{id}/balance
//! - GET  /api/gbs/banking/v4.0/accounts/{id}/transactions
//! - POST /api/gbs/banking/v4.0/accounts/{id}/payments/money-transfers

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

/// Canned HTTP response
#[derive(Debug, Clone)]
pub struct MockReply {
    pub status: u16,
    pub body: String,
}

impl MockReply {
    pub fn json(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_string(),
        }
    }

    pub fn empty() -> Self {
        Self::json(200, "")
    }
}

/// Replies per route
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub balance: MockReply,
    pub transactions: MockReply,
    pub transfer: MockReply,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            balance: MockReply::json(
                200,
                r#"{"status":"OK","errors":[],"payload":{"date":"2024-03-01","balance":1000.00,"availableBalance":1000.00,"currency":"EUR"}}"#,
            ),
            transactions: MockReply::json(
                200,
                r#"{"status":"OK","errors":[],"payload":[]}"#,
            ),
            transfer: MockReply::json(
                200,
                r#"{"status":"OK","errors":[],"payload":{"moneyTransferId":"1234567890","status":"EXECUTED"}}"#,
            ),
        }
    }
}

/// Request as seen by the mock server
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    /// Path including the query string
    pub target: String,
    /// Header names lowercased
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(String::as_str)
    }

    pub fn path(&self) -> &str {
        self.target.split('?').next().unwrap_or(&self.target)
    }

    pub fn query(&self) -> Option<&str> {
        self.target.split_once('?').map(|(_, q)| q)
    }
}

/// Mock Fabrick server for testing
pub struct MockFabrickServer {
    port: u16,
    running: Arc<AtomicBool>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockFabrickServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let requests = Arc::new(Mutex::new(Vec::new()));

        // Set listener to non-blocking for graceful shutdown
        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let requests_clone = requests.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let log = requests_clone.clone();
                        thread::spawn(move || {
                            handle_connection(stream, &cfg, &log);
                        });
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(10));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            requests,
            thread_handle: Some(thread_handle),
        })
    }

    /// Get the base URL for this mock server
    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    /// Requests received so far, in arrival order
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockFabrickServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(stream: TcpStream, config: &MockConfig, log: &Mutex<Vec<RecordedRequest>>) {
    // Accepted sockets inherit non-blocking mode on some platforms
    let _ = stream.set_nonblocking(false);

    let Some(request) = read_request(&stream) else {
        return;
    };

    let path = request.path().to_string();
    let method = request.method.clone();
    if let Ok(mut requests) = log.lock() {
        requests.push(request);
    }

    let reply = match (method.as_str(), route(&path)) {
        ("GET", Some(Route::Balance)) => config.balance.clone(),
        ("GET", Some(Route::Transactions)) => config.transactions.clone(),
        ("POST", Some(Route::Transfer)) => config.transfer.clone(),
        (_, Some(_)) => MockReply::json(405, r#"{"error":"Method not allowed"}"#),
        (_, None) => MockReply::json(404, r#"{"error":"Endpoint not found"}"#),
    };

    let mut stream = stream;
    send_response(&mut stream, &reply);
}

enum Route {
    Balance,
    Transactions,
    Transfer,
}

fn route(path: &str) -> Option<Route> {
    let rest = path.strip_prefix("/api/gbs/banking/v4.0/accounts/")?;
    let (account_id, resource) = rest.split_once('/')?;
    if account_id.parse::<u64>().is_err() {
        return None;
    }
    match resource {
        "balance" => Some(Route::Balance),
        "transactions" => Some(Route::Transactions),
        "payments/money-transfers" => Some(Route::Transfer),
        _ => None,
    }
}

fn read_request(stream: &TcpStream) -> Option<RecordedRequest> {
    let mut reader = BufReader::new(stream);

    let mut request_line = String::new();
    reader.read_line(&mut request_line).ok()?;
    let mut parts = request_line.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let mut headers = HashMap::new();
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).ok()? == 0 {
            break;
        }
        let line = line.trim_end();
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_lowercase(), value.trim().to_string());
        }
    }

    let content_length = headers
        .get("content-length")
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(0);
    let mut body = vec![0; content_length];
    reader.read_exact(&mut body).ok()?;

    Some(RecordedRequest {
        method,
        target,
        headers,
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

fn send_response(stream: &mut TcpStream, reply: &MockReply) {
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        reply.status,
        status_text(reply.status),
        reply.body.len(),
        reply.body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

fn status_text(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    use crate::adapters::duckdb::DuckDbAuditStore;
    use crate::adapters::fabrick::FabrickClient;
    use crate::domain::result::Error;
    use crate::domain::{TimeZoneId, TransferRequest};
    use crate::ports::{BankingApi, TransferAuditStore};
    use crate::services::{BankingService, TransferAuditor};

    const ACCOUNT_ID: u64 = 14537780;

    fn client(server: &MockFabrickServer) -> FabrickClient {
        FabrickClient::with_settings(&server.base_url(), "S2S", "test_key", Duration::from_secs(5))
            .unwrap()
    }

    fn tz() -> TimeZoneId {
        TimeZoneId::parse("Europe/Rome").unwrap()
    }

    fn transfer_request() -> TransferRequest {
        serde_json::from_str(
            r#"{
                "receiverName": "John Doe",
                "description": "Payment invoice 75/2017",
                "currency": "EUR",
                "amount": 800,
                "executionDate": "2019-04-01",
                "creditor": {"name": "John Doe", "account": {"accountCode": "IT23A0336844430152923804660", "bicCode": "SELBIT2BXXX"}}
            }"#,
        )
        .unwrap()
    }

    fn service(server: &MockFabrickServer) -> (BankingService, Arc<DuckDbAuditStore>) {
        let store = Arc::new(DuckDbAuditStore::in_memory().unwrap());
        store.ensure_schema().unwrap();
        let service = BankingService::new(
            Arc::new(client(server)),
            TransferAuditor::new(store.clone()),
            ACCOUNT_ID,
        );
        (service, store)
    }

    #[test]
    fn test_balance_request_shape() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();

        let envelope = client(&server).get_balance(ACCOUNT_ID, &tz()).unwrap().unwrap();
        assert!(envelope.is_ok());

        let requests = server.requests();
        assert_eq!(requests.len(), 1);
        let request = &requests[0];
        assert_eq!(request.method, "GET");
        assert_eq!(
            request.path(),
            "/api/gbs/banking/v4.0/accounts/14537780/balance"
        );
        assert_eq!(request.header("Auth-Schema"), Some("S2S"));
        assert_eq!(request.header("Api-Key"), Some("test_key"));
        assert_eq!(request.header("X-Time-Zone"), Some("Europe/Rome"));
        assert_eq!(request.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_transactions_query() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();

        let envelope = client(&server)
            .get_transactions(
                ACCOUNT_ID,
                NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2019, 12, 1).unwrap(),
                &tz(),
            )
            .unwrap()
            .unwrap();
        assert_eq!(envelope.payload, Some(Vec::new()));

        let request = &server.requests()[0];
        assert_eq!(
            request.path(),
            "/api/gbs/banking/v4.0/accounts/14537780/transactions"
        );
        assert_eq!(
            request.query(),
            Some("fromAccountingDate=2019-01-01&toAccountingDate=2019-12-01")
        );
    }

    #[test]
    fn test_transfer_posts_json_body() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();

        client(&server)
            .submit_transfer(ACCOUNT_ID, &transfer_request(), &tz())
            .unwrap();

        let request = &server.requests()[0];
        assert_eq!(request.method, "POST");
        assert_eq!(
            request.path(),
            "/api/gbs/banking/v4.0/accounts/14537780/payments/money-transfers"
        );

        let body: serde_json::Value = serde_json::from_str(&request.body).unwrap();
        assert_eq!(body["receiverName"], "John Doe");
        assert_eq!(body["amount"], 800.0);
        assert_eq!(body["executionDate"], "2019-04-01");
        assert_eq!(
            body["creditor"]["account"]["accountCode"],
            "IT23A0336844430152923804660"
        );
    }

    #[test]
    fn test_ko_envelope_is_decoded() {
        let server = MockFabrickServer::start(MockConfig {
            balance: MockReply::json(
                200,
                r#"{"status":"KO","errors":[{"code":"API000","description":"Account not found","params":""}],"payload":{}}"#,
            ),
            ..Default::default()
        })
        .unwrap();

        let envelope = client(&server).get_balance(ACCOUNT_ID, &tz()).unwrap().unwrap();
        assert!(!envelope.is_ok());
        assert_eq!(envelope.first_error_description(), Some("Account not found"));
        assert!(envelope.payload.is_none());
    }

    #[test]
    fn test_empty_body_is_none() {
        let server = MockFabrickServer::start(MockConfig {
            balance: MockReply::empty(),
            ..Default::default()
        })
        .unwrap();

        let envelope = client(&server).get_balance(ACCOUNT_ID, &tz()).unwrap();
        assert!(envelope.is_none());
    }

    #[test]
    fn test_http_error_is_remote_call() {
        let server = MockFabrickServer::start(MockConfig {
            balance: MockReply::json(500, r#"{"error":"boom"}"#),
            ..Default::default()
        })
        .unwrap();

        let err = client(&server).get_balance(ACCOUNT_ID, &tz()).unwrap_err();
        assert!(matches!(err, Error::RemoteCall(_)));
        assert!(err.to_string().contains("HTTP 500"));
    }

    #[test]
    fn test_malformed_json_is_remote_call() {
        let server = MockFabrickServer::start(MockConfig {
            transactions: MockReply::json(200, "{not json"),
            ..Default::default()
        })
        .unwrap();

        let day = NaiveDate::from_ymd_opt(2019, 1, 1).unwrap();
        let err = client(&server)
            .get_transactions(ACCOUNT_ID, day, day, &tz())
            .unwrap_err();
        assert!(matches!(err, Error::RemoteCall(_)));
    }

    #[test]
    fn test_unreachable_server_is_remote_call() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();
        let base_url = server.base_url();
        drop(server);

        let client =
            FabrickClient::with_settings(&base_url, "S2S", "test_key", Duration::from_secs(2))
                .unwrap();
        let err = client.get_balance(ACCOUNT_ID, &tz()).unwrap_err();
        assert!(matches!(err, Error::RemoteCall(_)));
    }

    #[test]
    fn test_service_balance_end_to_end() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();
        let (service, _store) = service(&server);

        let balance = service.get_balance(&tz()).unwrap();
        assert_eq!(balance.balance, Decimal::new(100000, 2));
        assert_eq!(balance.currency, "EUR");
    }

    #[test]
    fn test_service_transfer_ko_writes_nothing() {
        let server = MockFabrickServer::start(MockConfig {
            transfer: MockReply::json(
                200,
                r#"{"status":"KO","errors":[{"code":"API000","description":"Errore tecnico  La condizione BP049 non e' prevista per il conto id 14537780","params":""}],"payload":{}}"#,
            ),
            ..Default::default()
        })
        .unwrap();
        let (service, store) = service(&server);

        let err = service
            .create_money_transfer(&transfer_request(), &tz())
            .unwrap_err();

        assert!(matches!(err, Error::RemoteBusiness(_)));
        assert!(err.to_string().contains("BP049"));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_service_transfer_ok_writes_one_record() {
        let server = MockFabrickServer::start(MockConfig::default()).unwrap();
        let (service, store) = service(&server);

        let result = service
            .create_money_transfer(&transfer_request(), &tz())
            .unwrap();

        assert_eq!(result.money_transfer_id, "1234567890");
        assert_eq!(result.status, "EXECUTED");
        assert_eq!(store.count().unwrap(), 1);

        let day = NaiveDate::from_ymd_opt(2019, 4, 1).unwrap();
        let records = store.find_by_execution_date_between(day, day).unwrap();
        assert_eq!(records[0].transfer_id, "1234567890");
        assert_eq!(records[0].amount, Decimal::new(800, 0));
    }

    #[test]
    fn test_service_http_error_on_transfer_is_unwrapped() {
        let server = MockFabrickServer::start(MockConfig {
            transfer: MockReply::json(
                400,
                r#"{"status":"KO","errors":[{"code":"API000","description":"BP049"}],"payload":{}}"#,
            ),
            ..Default::default()
        })
        .unwrap();
        let (service, store) = service(&server);

        let err = service
            .create_money_transfer(&transfer_request(), &tz())
            .unwrap_err();

        assert!(matches!(err, Error::RemoteCall(_)));
        assert!(err.to_string().contains("BP049"));
        assert_eq!(store.count().unwrap(), 0);
    }
}
