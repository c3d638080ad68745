//! Typed request/response layer for talking to a Pylon instance over HTTP.
//! The retry loop is built on `backoff::future::retry`, the same
//! `BackoffError::transient`/`permanent` idiom the chain client's own
//! connection retries use, swapped onto `reqwest` for the transport.

use std::collections::HashMap;
use std::time::Duration;

use backoff::{future::retry, Error as BackoffError, ExponentialBackoffBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{
    BlockNumber, CertificateAlgorithm, Hotkey, Metagraph, NetUid, NeuronCertificateKeypair,
    SubnetNeurons,
};

/// Base of the request/response exception hierarchy, mirroring
/// `BasePylonException`'s role as the common parent for every failure a
/// caller of this client can observe.
#[derive(Debug, Error)]
pub enum BasePylonException {
    #[error(transparent)]
    Request(#[from] PylonRequestError),
    #[error(transparent)]
    Response(#[from] PylonResponseError),
}

/// The request never reached the server, or the transport itself failed:
/// connection refused, timeout, DNS failure. Retried by `AsyncPylonClient`.
#[derive(Debug, Error)]
pub enum PylonRequestError {
    #[error("request validation failed: {0}")]
    Validation(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// The server responded, but the response itself signals a failure: a
/// non-2xx status or a body that doesn't decode. Never retried.
#[derive(Debug, Error)]
pub enum PylonResponseError {
    #[error("server returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("failed to decode response body: {0}")]
    Decode(String),
}

const DEFAULT_STOP_AFTER_ATTEMPTS: usize = 3;
const RETRY_INITIAL: Duration = Duration::from_millis(100);
const RETRY_JITTER: Duration = Duration::from_millis(200);

/// A request this client knows how to send. Sealed in spirit: every
/// variant is defined in this module and carries its own path/method/body.
pub trait PylonRequest: Serialize {
    type Response: for<'de> Deserialize<'de>;

    fn method(&self) -> reqwest::Method;
    fn path(&self) -> String;
    fn body(&self) -> Option<&Self> {
        Some(self)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetWeightsRequest {
    pub weights: HashMap<Hotkey, f64>,
}

impl SetWeightsRequest {
    pub fn new(weights: HashMap<Hotkey, f64>) -> Result<Self, PylonRequestError> {
        if weights.is_empty() {
            return Err(PylonRequestError::Validation(
                "weights must not be empty".into(),
            ));
        }
        Ok(Self { weights })
    }
}

impl PylonRequest for SetWeightsRequest {
    type Response = ();
    fn method(&self) -> reqwest::Method {
        reqwest::Method::PUT
    }
    fn path(&self) -> String {
        "/api/v1/subnet/weights".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetNeuronsRequest {
    pub block: BlockNumber,
}

impl PylonRequest for GetNeuronsRequest {
    type Response = SubnetNeurons;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }
    fn path(&self) -> String {
        format!("/api/v1/subnet/{{netuid}}/neurons/{}", self.block)
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetLatestNeuronsRequest;

impl PylonRequest for GetLatestNeuronsRequest {
    type Response = SubnetNeurons;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }
    fn path(&self) -> String {
        "/api/v1/neurons/latest".to_string()
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetMetagraphRequest {
    pub block: Option<BlockNumber>,
}

impl PylonRequest for GetMetagraphRequest {
    type Response = Metagraph;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }
    fn path(&self) -> String {
        match self.block {
            Some(block) => format!("/api/v1/metagraph?block={block}"),
            None => "/api/v1/metagraph".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateCertificateKeypairRequest {
    pub algorithm: CertificateAlgorithm,
}

impl GenerateCertificateKeypairRequest {
    pub fn new(algorithm: CertificateAlgorithm) -> Result<Self, PylonRequestError> {
        if !matches!(algorithm, CertificateAlgorithm::Ed25519) {
            return Err(PylonRequestError::Validation(
                "algorithm must be ED25519".into(),
            ));
        }
        Ok(Self { algorithm })
    }
}

impl PylonRequest for GenerateCertificateKeypairRequest {
    type Response = NeuronCertificateKeypair;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }
    fn path(&self) -> String {
        "/api/v1/certificates/self".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SetCommitmentRequest {
    pub data: Vec<u8>,
}

impl SetCommitmentRequest {
    /// `data` is accepted either as raw bytes or as a `0x`-prefixed (or
    /// bare) hex string, matching the chain adapter's own commitment
    /// encoding flexibility.
    pub fn from_bytes(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn from_hex(hex_str: &str) -> Result<Self, PylonRequestError> {
        let trimmed = hex_str.strip_prefix("0x").unwrap_or(hex_str);
        let data = hex::decode(trimmed)
            .map_err(|e| PylonRequestError::Validation(format!("invalid hex commitment data: {e}")))?;
        Ok(Self { data })
    }
}

impl PylonRequest for SetCommitmentRequest {
    type Response = ();
    fn method(&self) -> reqwest::Method {
        reqwest::Method::POST
    }
    fn path(&self) -> String {
        "/api/v1/certificates/self".to_string()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct GetCommitmentRequest {
    pub hotkey: Hotkey,
    pub block: Option<BlockNumber>,
}

impl PylonRequest for GetCommitmentRequest {
    type Response = Option<Vec<u8>>;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }
    fn path(&self) -> String {
        format!("/api/v1/certificates/{}", self.hotkey.as_str())
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct GetCommitmentsRequest {
    pub block: Option<BlockNumber>,
}

impl PylonRequest for GetCommitmentsRequest {
    type Response = HashMap<Hotkey, Vec<u8>>;
    fn method(&self) -> reqwest::Method {
        reqwest::Method::GET
    }
    fn path(&self) -> String {
        "/api/v1/certificates".to_string()
    }
}

pub struct AsyncPylonClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
    stop_after_attempts: usize,
}

impl AsyncPylonClient {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
            token: token.into(),
            stop_after_attempts: DEFAULT_STOP_AFTER_ATTEMPTS,
        }
    }

    pub fn with_stop_after_attempts(mut self, attempts: usize) -> Self {
        self.stop_after_attempts = attempts;
        self
    }

    async fn send_once<R: PylonRequest + Send + Sync>(
        &self,
        netuid: NetUid,
        request: &R,
    ) -> Result<R::Response, BasePylonException> {
        let url = format!(
            "{}{}",
            self.base_url,
            request.path().replace("{netuid}", &netuid.to_string())
        );
        let response = self
            .http
            .request(request.method(), url)
            .bearer_auth(&self.token)
            .json(request)
            .send()
            .await
            .map_err(|e| PylonRequestError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(BasePylonException::Response(PylonResponseError::Status {
                status: status.as_u16(),
                body,
            }));
        }

        response
            .json::<R::Response>()
            .await
            .map_err(|e| BasePylonException::Response(PylonResponseError::Decode(e.to_string())))
    }

    /// Send a request, retrying only transport-level failures with
    /// exponential backoff and jitter. An HTTP-status or decode failure is
    /// surfaced on the first attempt: retrying those would resubmit an
    /// extrinsic-bearing request the server may have already applied.
    pub async fn execute<R: PylonRequest + Send + Sync>(
        &self,
        netuid: NetUid,
        request: &R,
    ) -> Result<R::Response, BasePylonException> {
        let backoff = ExponentialBackoffBuilder::new()
            .with_initial_interval(RETRY_INITIAL)
            .with_randomization_factor(0.0)
            .with_max_interval(RETRY_INITIAL + RETRY_JITTER)
            .with_max_elapsed_time(None)
            .build();

        let mut attempt = 0usize;
        retry(backoff, || async {
            attempt += 1;
            match self.send_once(netuid, request).await {
                Ok(value) => Ok(value),
                Err(BasePylonException::Request(PylonRequestError::Transport(msg))) => {
                    if attempt >= self.stop_after_attempts {
                        Err(BackoffError::permanent(BasePylonException::Request(
                            PylonRequestError::Transport(msg),
                        )))
                    } else {
                        Err(BackoffError::transient(BasePylonException::Request(
                            PylonRequestError::Transport(msg),
                        )))
                    }
                }
                // A decoded HTTP status or body failure is final: retrying
                // risks resubmitting an extrinsic-bearing request the
                // server may have already applied.
                Err(other) => Err(BackoffError::permanent(other)),
            }
        })
        .await
    }
}

pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Canned behaviors for [`MockPylonClient`], named after the scenarios
    /// the real transport can hit.
    #[derive(Clone)]
    pub enum Behavior {
        WorkNormally,
        RaiseRequestError(String),
        RaiseResponseError(u16, String),
    }

    pub struct MockPylonClient {
        behavior: Mutex<Behavior>,
        calls: Mutex<Vec<String>>,
    }

    impl MockPylonClient {
        pub fn new(behavior: Behavior) -> Self {
            Self {
                behavior: Mutex::new(behavior),
                calls: Mutex::new(Vec::new()),
            }
        }

        pub fn set_behavior(&self, behavior: Behavior) {
            *self.behavior.lock().unwrap() = behavior;
        }

        pub fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        /// Mirrors [`AsyncPylonClient::execute`]'s signature so tests can
        /// swap one for the other behind the same call sites. `WorkNormally`
        /// requires a `Default` response since the mock never actually runs
        /// a request handler; callers that need a specific payload back
        /// should assert on `calls()` instead of the return value.
        pub async fn execute<R: PylonRequest + Send + Sync>(
            &self,
            _netuid: NetUid,
            request: &R,
        ) -> Result<R::Response, BasePylonException>
        where
            R::Response: Default,
        {
            self.calls.lock().unwrap().push(request.path());
            match self.behavior.lock().unwrap().clone() {
                Behavior::WorkNormally => Ok(R::Response::default()),
                Behavior::RaiseRequestError(msg) => {
                    Err(BasePylonException::Request(PylonRequestError::Transport(msg)))
                }
                Behavior::RaiseResponseError(status, body) => Err(BasePylonException::Response(
                    PylonResponseError::Status { status, body },
                )),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_weights_rejects_empty_map() {
        assert!(SetWeightsRequest::new(HashMap::new()).is_err());
    }

    #[test]
    fn set_weights_accepts_non_empty_map() {
        let mut weights = HashMap::new();
        weights.insert(Hotkey::from("a"), 1.0);
        assert!(SetWeightsRequest::new(weights).is_ok());
    }

    #[test]
    fn generate_keypair_rejects_non_ed25519() {
        assert!(GenerateCertificateKeypairRequest::new(CertificateAlgorithm::Unknown(9)).is_err());
    }

    #[test]
    fn set_commitment_accepts_hex_with_and_without_prefix() {
        assert_eq!(
            SetCommitmentRequest::from_hex("0xdead").unwrap().data,
            vec![0xde, 0xad]
        );
        assert_eq!(
            SetCommitmentRequest::from_hex("dead").unwrap().data,
            vec![0xde, 0xad]
        );
    }
}
