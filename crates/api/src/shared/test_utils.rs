use callme_reminder_domain::{Reminder, ReminderStats, ReminderStatus, ID};
use callme_reminder_infra::{
    CallRequest, CallmeContext, Config, DispatchError, INotificationDispatcher, IReminderRepo,
    ReminderPage, ReminderQuery, StaticTimeSys, VapiConfig,
};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

/// 2021-02-20T23:00:00Z
pub const NOW: i64 = 1613862000000;

pub fn test_config() -> Config {
    Config {
        port: 0,
        database_url: None,
        poll_interval: Duration::from_millis(20),
        vapi: VapiConfig {
            api_key: String::new(),
            phone_number_id: String::new(),
            base_url: "http://127.0.0.1:1".into(),
            timeout: Duration::from_secs(1),
        },
    }
}

pub fn setup_context(dispatcher: Arc<MockDispatcher>) -> CallmeContext {
    let mut ctx = CallmeContext::create_inmemory(test_config());
    ctx.sys = Arc::new(StaticTimeSys(NOW));
    ctx.dispatcher = dispatcher;
    ctx
}

/// Stores a scheduled reminder due at `due_at`, which may be in the past
pub async fn insert_reminder(ctx: &CallmeContext, title: &str, due_at: i64) -> Reminder {
    let reminder = Reminder::new(
        title.into(),
        "Remember to call back".into(),
        "+14155552671".into(),
        due_at,
        chrono_tz::UTC,
        due_at - 1000,
    )
    .expect("Valid reminder");
    ctx.repos
        .reminders
        .insert(&reminder)
        .await
        .expect("To insert reminder");
    reminder
}

enum Outcome {
    Success,
    Timeout,
    Rejected(String),
}

/// Dispatcher that records every call instead of placing it
pub struct MockDispatcher {
    outcome: Outcome,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<CallRequest>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    observe: Mutex<Option<(Arc<dyn IReminderRepo>, ID)>>,
    observed: Mutex<Vec<Option<ReminderStatus>>>,
}

impl MockDispatcher {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            delay: Mutex::new(Duration::from_millis(0)),
            calls: Default::default(),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            observe: Default::default(),
            observed: Default::default(),
        })
    }

    /// Every call succeeds with the call id `call_123`
    pub fn succeeding() -> Arc<Self> {
        Self::new(Outcome::Success)
    }

    pub fn timing_out() -> Arc<Self> {
        Self::new(Outcome::Timeout)
    }

    /// Every call is rejected by the provider with a 502 and the given body
    pub fn rejecting(body: String) -> Arc<Self> {
        Self::new(Outcome::Rejected(body))
    }

    pub fn with_delay(self: Arc<Self>, delay: Duration) -> Arc<Self> {
        *self.delay.lock().unwrap() = delay;
        self
    }

    /// Records the stored status of the given reminder whenever a call is placed
    pub fn observe_status_during_call(&self, repo: Arc<dyn IReminderRepo>, reminder_id: ID) {
        *self.observe.lock().unwrap() = Some((repo, reminder_id));
    }

    pub fn observed_statuses(&self) -> Vec<Option<ReminderStatus>> {
        self.observed.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<CallRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of calls that were in flight at the same time
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl INotificationDispatcher for MockDispatcher {
    async fn place_call(&self, request: &CallRequest) -> Result<String, DispatchError> {
        self.calls.lock().unwrap().push(request.clone());
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let observe = self.observe.lock().unwrap().clone();
        if let Some((repo, reminder_id)) = observe {
            let status = repo.find(&reminder_id).await.map(|r| r.status);
            self.observed.lock().unwrap().push(status);
        }

        let delay = *self.delay.lock().unwrap();
        if delay > Duration::from_millis(0) {
            tokio::time::sleep(delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match &self.outcome {
            Outcome::Success => Ok("call_123".into()),
            Outcome::Timeout => Err(DispatchError::Timeout("Vapi")),
            Outcome::Rejected(body) => Err(DispatchError::Rejected {
                provider: "Vapi",
                status: 502,
                body: body.clone(),
            }),
        }
    }
}

/// Wraps the reminder store of a context to count writes and inject failures
pub struct CountingReminderRepo {
    inner: Arc<dyn IReminderRepo>,
    writes: AtomicUsize,
    failing_claims: Mutex<Vec<ID>>,
}

impl CountingReminderRepo {
    pub fn wrap(ctx: &mut CallmeContext) -> Arc<Self> {
        let repo = Arc::new(Self {
            inner: ctx.repos.reminders.clone(),
            writes: AtomicUsize::new(0),
            failing_claims: Default::default(),
        });
        ctx.repos.reminders = repo.clone();
        repo
    }

    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_claim_of(&self, reminder_id: ID) {
        self.failing_claims.lock().unwrap().push(reminder_id);
    }

    fn record_write(&self) {
        self.writes.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl IReminderRepo for CountingReminderRepo {
    async fn insert(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.record_write();
        self.inner.insert(reminder).await
    }

    async fn find(&self, reminder_id: &ID) -> Option<Reminder> {
        self.inner.find(reminder_id).await
    }

    async fn find_due_ids(&self, now: i64) -> anyhow::Result<Vec<ID>> {
        self.inner.find_due_ids(now).await
    }

    async fn claim(&self, reminder_id: &ID, now: i64) -> anyhow::Result<Option<Reminder>> {
        if self.failing_claims.lock().unwrap().contains(reminder_id) {
            return Err(anyhow::anyhow!("Connection reset"));
        }
        self.record_write();
        self.inner.claim(reminder_id, now).await
    }

    async fn resolve(&self, reminder: &Reminder) -> anyhow::Result<()> {
        self.record_write();
        self.inner.resolve(reminder).await
    }

    async fn save_scheduled(&self, reminder: &Reminder) -> anyhow::Result<bool> {
        self.record_write();
        self.inner.save_scheduled(reminder).await
    }

    async fn delete(&self, reminder_id: &ID) -> Option<Reminder> {
        self.record_write();
        self.inner.delete(reminder_id).await
    }

    async fn find_by_query(&self, query: &ReminderQuery) -> anyhow::Result<ReminderPage> {
        self.inner.find_by_query(query).await
    }

    async fn count_by_status(&self) -> anyhow::Result<ReminderStats> {
        self.inner.count_by_status().await
    }
}
