use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use serde::de::DeserializeOwned;

use opsdesk_auth::{AuthzError, Permission, Session, authorize_session};
use opsdesk_core::{FormSchema, Record};
use opsdesk_infra::{
    AppConfig, AuthClient, AuthError, DocumentStore, RecordRepository, RepositoryError, log_and_continue,
};
use opsdesk_pages::{Dashboard, RecordPage, Workspace};

/// One signed-in client session: config, hosted-service clients and pages.
pub struct App<S, A> {
    pub config: AppConfig,
    pub store: Arc<S>,
    pub auth: A,
    pub workspace: Workspace,
}

impl<S, A> App<S, A>
where
    S: DocumentStore,
    A: AuthClient,
{
    pub fn new(config: AppConfig, store: Arc<S>, auth: A) -> Self {
        let workspace =
            Workspace::with_mock_data(config.expiry_window_days).with_display_currency(config.currency.clone());
        Self {
            config,
            store,
            auth,
            workspace,
        }
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session, AuthError> {
        self.auth.sign_in(email, password).await
    }

    /// Write every page's records to the document store.
    ///
    /// Store failures are logged and skipped; returns how many records were saved.
    pub async fn persist(&self) -> Result<usize, AuthzError> {
        let session = self.auth.current_session().await;
        authorize_session(session.as_ref(), Permission::RecordsWrite)?;

        let ws = &self.workspace;
        let mut saved = 0;
        saved += persist_page(&self.store, &ws.assets).await;
        saved += persist_page(&self.store, &ws.licenses).await;
        saved += persist_page(&self.store, &ws.servers).await;
        saved += persist_page(&self.store, &ws.stock).await;
        saved += persist_page(&self.store, &ws.contracts).await;
        saved += persist_page(&self.store, &ws.invoices).await;
        saved += persist_page(&self.store, &ws.campaigns).await;
        saved += persist_page(&self.store, &ws.tax_rates).await;
        saved += persist_page(&self.store, &ws.currencies).await;
        saved += persist_page(&self.store, &ws.integrations).await;
        saved += persist_page(&self.store, &ws.users).await;
        tracing::info!(saved, "workspace persisted");
        Ok(saved)
    }

    pub async fn dashboard(&self, today: NaiveDate) -> Dashboard {
        let session = self.auth.current_session().await;
        Dashboard::snapshot(&self.workspace, session.as_ref(), today)
    }
}

async fn persist_page<S, F>(store: &Arc<S>, page: &RecordPage<F>) -> usize
where
    S: DocumentStore,
    F: FormSchema,
    F::Record: Record + Serialize + DeserializeOwned,
{
    let kind = <F::Record as Record>::KIND;
    let repo: RecordRepository<_, F::Record> = RecordRepository::new(Arc::clone(store));
    let mut saved = 0;
    for record in page.records() {
        match repo.save(record).await {
            Ok(()) => saved += 1,
            Err(RepositoryError::Store(err)) => {
                log_and_continue::<()>(kind, Err(err));
            }
            Err(err) => tracing::error!(kind, error = %err, "record not saved"),
        }
    }
    saved
}
