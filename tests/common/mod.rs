#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum_test::TestServer;
use goodiex_api::api;
use goodiex_api::application::credentials::{ApiCredential, OPENAI_API_KEY, STRIPE_SECRET_KEY};
use goodiex_api::application::services::{
    CheckoutService, CheckoutUrls, DomainVerificationService, MealAnalysisService,
};
use goodiex_api::domain::entities::{CheckoutSession, ModelOutput, NewCheckoutSession, RecordKind};
use goodiex_api::domain::ports::{
    CredentialStore, CredentialStoreError, DnsLookup, DnsLookupError, PaymentError,
    PaymentGateway, VisionError, VisionModel,
};
use goodiex_api::state::AppState;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub const SUCCESS_URL: &str = "https://goodiex.vercel.app/payment-success";
pub const CANCEL_URL: &str = "https://api.theholylabs.com/error";

/// Payment gateway recording every session it is asked to create.
#[derive(Default)]
pub struct FakePaymentGateway {
    pub sessions: Mutex<Vec<(String, NewCheckoutSession)>>,
    pub failure: Option<(u16, String)>,
}

impl FakePaymentGateway {
    pub fn failing(status: u16, message: &str) -> Self {
        Self {
            failure: Some((status, message.to_string())),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<(String, NewCheckoutSession)> {
        self.sessions.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGateway for FakePaymentGateway {
    async fn create_checkout_session(
        &self,
        api_key: &str,
        session: &NewCheckoutSession,
    ) -> Result<CheckoutSession, PaymentError> {
        self.sessions
            .lock()
            .unwrap()
            .push((api_key.to_string(), session.clone()));

        if let Some((status, message)) = &self.failure {
            return Err(PaymentError::Provider {
                status: *status,
                message: message.clone(),
            });
        }

        Ok(CheckoutSession {
            id: "cs_test_fake".to_string(),
            url: "https://checkout.stripe.com/c/pay/cs_test_fake".to_string(),
        })
    }
}

/// DNS lookup answering from fixed tables and counting queries.
#[derive(Default)]
pub struct FakeDnsLookup {
    pub hosts: HashMap<String, IpAddr>,
    pub records: HashMap<(String, RecordKind), Vec<String>>,
    pub queries: AtomicUsize,
}

impl FakeDnsLookup {
    pub fn with_host(mut self, domain: &str, ip: &str) -> Self {
        self.hosts.insert(domain.to_string(), ip.parse().unwrap());
        self
    }

    pub fn with_records(mut self, domain: &str, kind: RecordKind, values: &[&str]) -> Self {
        self.records.insert(
            (domain.to_string(), kind),
            values.iter().map(|v| v.to_string()).collect(),
        );
        self
    }

    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsLookup for FakeDnsLookup {
    async fn resolve_host(&self, domain: &str) -> Result<IpAddr, DnsLookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.hosts
            .get(domain)
            .copied()
            .ok_or_else(|| DnsLookupError::NotFound {
                domain: domain.to_string(),
                kind: "A".to_string(),
            })
    }

    async fn lookup(&self, domain: &str, kind: RecordKind) -> Result<Vec<String>, DnsLookupError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        self.records
            .get(&(domain.to_string(), kind))
            .cloned()
            .ok_or_else(|| DnsLookupError::NotFound {
                domain: domain.to_string(),
                kind: kind.to_string(),
            })
    }
}

/// Vision model returning a canned answer.
pub struct FakeVisionModel {
    pub answer: Result<ModelOutput, String>,
    pub calls: AtomicUsize,
}

impl FakeVisionModel {
    pub fn text(output: &str) -> Self {
        Self {
            answer: Ok(ModelOutput::Text(output.to_string())),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn structured(output: serde_json::Value) -> Self {
        Self {
            answer: Ok(ModelOutput::Structured(output)),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            answer: Err(message.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl VisionModel for FakeVisionModel {
    async fn analyze_image(
        &self,
        _api_key: &str,
        _image_url: &str,
        _prompt: &str,
    ) -> Result<ModelOutput, VisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.answer.clone().map_err(VisionError::Transport)
    }
}

/// Credential store backed by a map.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    pub values: Mutex<HashMap<String, String>>,
    pub loads: AtomicUsize,
}

impl InMemoryCredentialStore {
    pub fn with(name: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        store
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self, name: &str) -> Result<Option<String>, CredentialStoreError> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.values.lock().unwrap().get(name).cloned())
    }

    async fn save(&self, name: &str, value: &str) -> Result<(), CredentialStoreError> {
        self.values
            .lock()
            .unwrap()
            .insert(name.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, name: &str) -> Result<bool, CredentialStoreError> {
        Ok(self.values.lock().unwrap().remove(name).is_some())
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Collaborators used to build an [`AppState`]; tests keep handles to
/// inspect calls afterwards.
pub struct TestDeps {
    pub payments: Arc<FakePaymentGateway>,
    pub dns: Arc<FakeDnsLookup>,
    pub vision: Arc<FakeVisionModel>,
    pub store: Arc<InMemoryCredentialStore>,
    pub stripe_key: Option<String>,
    pub openai_key: Option<String>,
}

impl Default for TestDeps {
    fn default() -> Self {
        Self {
            payments: Arc::new(FakePaymentGateway::default()),
            dns: Arc::new(FakeDnsLookup::default()),
            vision: Arc::new(FakeVisionModel::text("{}")),
            store: Arc::new(InMemoryCredentialStore::default()),
            stripe_key: Some("sk_test_fake".to_string()),
            openai_key: Some("sk-openai-fake".to_string()),
        }
    }
}

pub fn create_test_state(deps: &TestDeps) -> AppState {
    let store: Arc<dyn CredentialStore> = deps.store.clone();

    let stripe_key = Arc::new(ApiCredential::new(
        STRIPE_SECRET_KEY,
        deps.stripe_key.clone(),
        store.clone(),
    ));
    let openai_key = Arc::new(ApiCredential::new(
        OPENAI_API_KEY,
        deps.openai_key.clone(),
        store.clone(),
    ));

    AppState {
        checkout_service: Arc::new(CheckoutService::new(
            deps.payments.clone(),
            stripe_key,
            CheckoutUrls {
                success_url: SUCCESS_URL.to_string(),
                cancel_url: CANCEL_URL.to_string(),
            },
        )),
        domain_service: Arc::new(DomainVerificationService::new(
            deps.dns.clone(),
            "goodiex.com",
        )),
        meal_service: Arc::new(MealAnalysisService::new(deps.vision.clone(), openai_key)),
        credential_store: store,
    }
}

/// Test server over the public routes, without rate limiting.
pub fn create_test_server(deps: &TestDeps) -> TestServer {
    let app: Router = api::routes::routes().with_state(create_test_state(deps));
    TestServer::new(app).unwrap()
}
