//! Counting mock of the Pi-hole used by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;

use crate::api::{ApiError, Upstream};
use crate::auth::AuthError;
use crate::models::{BlockingState, BlockingStatus, SetBlockingRequest};

pub struct MockUpstream {
    login: Login,
    auth_delay: Option<Duration>,
    fail_data_calls: bool,
    auth_calls: AtomicUsize,
    last_password: Mutex<Option<String>>,
    seen_sids: Mutex<Vec<Option<String>>>,
    set_requests: Mutex<Vec<SetBlockingRequest>>,
    status: Mutex<BlockingStatus>,
}

enum Login {
    Sid(String),
    NoPassword,
    Rejected,
}

impl MockUpstream {
    pub fn new(sid: &str) -> Self {
        Self {
            login: Login::Sid(sid.to_string()),
            auth_delay: None,
            fail_data_calls: false,
            auth_calls: AtomicUsize::new(0),
            last_password: Mutex::new(None),
            seen_sids: Mutex::new(Vec::new()),
            set_requests: Mutex::new(Vec::new()),
            status: Mutex::new(BlockingStatus {
                blocking: BlockingState::Enabled,
                timer: None,
            }),
        }
    }

    /// Mock whose login always answers 401
    pub fn rejecting() -> Self {
        Self {
            login: Login::Rejected,
            ..Self::new("")
        }
    }

    /// Mock of a Pi-hole without a password: login succeeds with no sid
    pub fn passwordless() -> Self {
        Self {
            login: Login::NoPassword,
            ..Self::new("")
        }
    }

    pub fn with_auth_delay(mut self, delay: Duration) -> Self {
        self.auth_delay = Some(delay);
        self
    }

    /// Login succeeds but every data call answers 500
    pub fn failing_data_calls(mut self) -> Self {
        self.fail_data_calls = true;
        self
    }

    pub fn with_status(self, status: BlockingStatus) -> Self {
        *self.status.lock().unwrap() = status;
        self
    }

    pub fn auth_calls(&self) -> usize {
        self.auth_calls.load(Ordering::SeqCst)
    }

    pub fn last_password(&self) -> Option<String> {
        self.last_password.lock().unwrap().clone()
    }

    pub fn seen_sids(&self) -> Vec<Option<String>> {
        self.seen_sids.lock().unwrap().clone()
    }

    pub fn set_requests(&self) -> Vec<SetBlockingRequest> {
        self.set_requests.lock().unwrap().clone()
    }

    fn data_call(&self, sid: Option<&str>) -> Result<(), ApiError> {
        self.seen_sids.lock().unwrap().push(sid.map(str::to_string));
        if self.fail_data_calls {
            return Err(ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, "FTL offline"));
        }
        Ok(())
    }
}

#[async_trait]
impl Upstream for MockUpstream {
    async fn authenticate(&self, password: &str) -> Result<Option<String>, AuthError> {
        self.auth_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_password.lock().unwrap() = Some(password.to_string());
        if let Some(delay) = self.auth_delay {
            tokio::time::sleep(delay).await;
        }
        match self.login {
            Login::Sid(ref sid) => Ok(Some(sid.clone())),
            Login::NoPassword => Ok(None),
            Login::Rejected => Err(ApiError::from_status(
                StatusCode::UNAUTHORIZED,
                r#"{"session":{"valid":false,"message":"password incorrect"}}"#,
            )
            .into()),
        }
    }

    async fn blocking_status(&self, sid: Option<&str>) -> Result<BlockingStatus, ApiError> {
        self.data_call(sid)?;
        Ok(self.status.lock().unwrap().clone())
    }

    async fn set_blocking(&self, sid: Option<&str>, request: &SetBlockingRequest) -> Result<(), ApiError> {
        self.data_call(sid)?;
        self.set_requests.lock().unwrap().push(request.clone());
        Ok(())
    }
}
