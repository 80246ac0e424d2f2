#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use dashguard_core::alert::AlertSync;
use dashguard_core::dashboard::{
    Dashboard, DashboardCommit, DashboardProvisioning, OrgRole, ProvisioningInfo,
    SaveDashboardRequest, SignedInUser,
};
use dashguard_core::guardian::Guardian;
use dashguard_core::store::{DashboardStore, StoreError};
use dashguard_core::types::{BoxError, DbId, Version};
use dashguard_core::validation::titles_match;
use dashguard_pipeline::DashboardService;

// ---------------------------------------------------------------------------
// In-memory store
// ---------------------------------------------------------------------------

/// One appended version history entry.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub dashboard_id: DbId,
    pub version: Version,
    pub message: String,
}

#[derive(Default)]
struct StoreState {
    rows: Vec<Dashboard>,
    next_id: DbId,
    history: Vec<HistoryEntry>,
    provisioning: Vec<DashboardProvisioning>,
    fail_next_commit: bool,
    race: Option<Race>,
}

impl StoreState {
    fn push_raw(&mut self, org_id: DbId, folder_id: DbId, uid: Option<&str>, title: &str) -> DbId {
        self.next_id += 1;
        let id = self.next_id;
        self.rows.push(Dashboard {
            id,
            uid: uid.map_or_else(|| format!("raw-{id}"), str::to_string),
            org_id,
            folder_id,
            is_folder: false,
            title: title.to_string(),
            slug: dashguard_core::dashboard::slugify(title),
            version: 1,
            data: Default::default(),
            created_by: 0,
            updated_by: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        });
        id
    }
}

/// A concurrent write that lands after validation but before our commit.
pub enum Race {
    BumpVersion(DbId),
    TakeTitle {
        org_id: DbId,
        folder_id: DbId,
        title: String,
    },
    TakeUid {
        org_id: DbId,
        uid: String,
    },
}

/// `DashboardStore` over a mutex-guarded vector, enforcing the same commit
/// time invariants as the PostgreSQL store.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<StoreState>,
}

impl MemoryStore {
    pub fn get(&self, org_id: DbId, id: DbId) -> Option<Dashboard> {
        let state = self.state.lock().unwrap();
        state
            .rows
            .iter()
            .find(|d| d.org_id == org_id && d.id == id)
            .cloned()
    }

    pub fn count(&self) -> usize {
        self.state.lock().unwrap().rows.len()
    }

    pub fn history(&self) -> Vec<HistoryEntry> {
        self.state.lock().unwrap().history.clone()
    }

    /// Bump a row's version as another writer would.
    pub fn bump_version(&self, id: DbId) {
        let mut state = self.state.lock().unwrap();
        if let Some(row) = state.rows.iter_mut().find(|d| d.id == id) {
            row.version += 1;
        }
    }

    /// Run `race` inside the next commit, before any of its checks.
    pub fn race_next_commit(&self, race: Race) {
        self.state.lock().unwrap().race = Some(race);
    }

    pub fn fail_next_commit(&self) {
        self.state.lock().unwrap().fail_next_commit = true;
    }

    fn apply(&self, commit: DashboardCommit) -> Result<Dashboard, StoreError> {
        let mut state = self.state.lock().unwrap();

        if std::mem::take(&mut state.fail_next_commit) {
            return Err(StoreError::Backend("connection reset by peer".into()));
        }

        match state.race.take() {
            Some(Race::BumpVersion(id)) => {
                if let Some(row) = state.rows.iter_mut().find(|d| d.id == id) {
                    row.version += 1;
                }
            }
            Some(Race::TakeTitle {
                org_id,
                folder_id,
                title,
            }) => {
                state.push_raw(org_id, folder_id, None, &title);
            }
            Some(Race::TakeUid { org_id, uid }) => {
                state.push_raw(org_id, 0, Some(&uid), &format!("racer {uid}"));
            }
            None => {}
        }

        let uid_taken = state
            .rows
            .iter()
            .any(|d| d.org_id == commit.org_id && d.uid == commit.uid && Some(d.id) != commit.id);
        if uid_taken {
            return Err(StoreError::UidConflict { uid: commit.uid });
        }

        let title_taken = state.rows.iter().any(|d| {
            d.org_id == commit.org_id
                && d.folder_id == commit.folder_id
                && titles_match(&d.title, &commit.title)
                && Some(d.id) != commit.id
        });
        if title_taken {
            return Err(StoreError::TitleConflict);
        }

        let now = Utc::now();
        let saved = match commit.id {
            Some(id) => {
                let row = state
                    .rows
                    .iter_mut()
                    .find(|d| d.org_id == commit.org_id && d.id == id)
                    .ok_or(StoreError::VersionConflict)?;
                if Some(row.version) != commit.expected_prior_version {
                    return Err(StoreError::VersionConflict);
                }
                row.uid = commit.uid;
                row.folder_id = commit.folder_id;
                row.title = commit.title;
                row.slug = commit.slug;
                row.version = commit.version;
                row.data = commit.data;
                row.updated_by = commit.user_id;
                row.updated_at = commit.updated_at;
                row.clone()
            }
            None => {
                state.next_id += 1;
                let row = Dashboard {
                    id: state.next_id,
                    uid: commit.uid,
                    org_id: commit.org_id,
                    folder_id: commit.folder_id,
                    is_folder: commit.is_folder,
                    title: commit.title,
                    slug: commit.slug,
                    version: commit.version,
                    data: commit.data,
                    created_by: commit.user_id,
                    updated_by: commit.user_id,
                    created_at: now,
                    updated_at: commit.updated_at,
                };
                state.rows.push(row.clone());
                row
            }
        };

        state.history.push(HistoryEntry {
            dashboard_id: saved.id,
            version: saved.version,
            message: commit.message,
        });
        Ok(saved)
    }
}

#[async_trait]
impl DashboardStore for MemoryStore {
    async fn find_by_id(&self, org_id: DbId, id: DbId) -> Result<Option<Dashboard>, StoreError> {
        Ok(self.get(org_id, id))
    }

    async fn find_by_uid(&self, org_id: DbId, uid: &str) -> Result<Option<Dashboard>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .find(|d| d.org_id == org_id && d.uid == uid)
            .cloned())
    }

    async fn find_by_title_in_scope(
        &self,
        org_id: DbId,
        folder_id: DbId,
        title: &str,
        exclude_id: Option<DbId>,
    ) -> Result<Vec<Dashboard>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .rows
            .iter()
            .filter(|d| {
                d.org_id == org_id
                    && d.folder_id == folder_id
                    && titles_match(&d.title, title)
                    && Some(d.id) != exclude_id
            })
            .cloned()
            .collect())
    }

    async fn commit(&self, commit: DashboardCommit) -> Result<Dashboard, StoreError> {
        self.apply(commit)
    }

    async fn commit_provisioned(
        &self,
        commit: DashboardCommit,
        provisioning: ProvisioningInfo,
    ) -> Result<Dashboard, StoreError> {
        let saved = self.apply(commit)?;
        let mut state = self.state.lock().unwrap();
        state.provisioning.retain(|p| p.dashboard_id != saved.id);
        let id = state.provisioning.len() as DbId + 1;
        state.provisioning.push(DashboardProvisioning {
            id,
            dashboard_id: saved.id,
            name: provisioning.name,
            external_id: provisioning.external_id,
            updated: provisioning.updated,
        });
        Ok(saved)
    }

    async fn provisioned_dashboards(
        &self,
        name: &str,
    ) -> Result<Vec<DashboardProvisioning>, StoreError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .provisioning
            .iter()
            .filter(|p| p.name == name)
            .cloned()
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Guardian
// ---------------------------------------------------------------------------

/// One recorded `can_save` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardianCall {
    pub dashboard_id: DbId,
    pub org_id: DbId,
    pub user_id: DbId,
}

pub enum GuardianAnswer {
    Allow,
    Deny,
    Fail(&'static str),
}

/// Guardian that returns a fixed answer and records its arguments.
pub struct ScriptedGuardian {
    answer: Mutex<GuardianAnswer>,
    calls: Mutex<Vec<GuardianCall>>,
}

impl ScriptedGuardian {
    pub fn new(answer: GuardianAnswer) -> Self {
        Self {
            answer: Mutex::new(answer),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn set(&self, answer: GuardianAnswer) {
        *self.answer.lock().unwrap() = answer;
    }

    pub fn calls(&self) -> Vec<GuardianCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> Option<GuardianCall> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Guardian for ScriptedGuardian {
    async fn can_save(
        &self,
        dashboard_id: DbId,
        org_id: DbId,
        user: &SignedInUser,
    ) -> Result<bool, BoxError> {
        self.calls.lock().unwrap().push(GuardianCall {
            dashboard_id,
            org_id,
            user_id: user.user_id,
        });
        match &*self.answer.lock().unwrap() {
            GuardianAnswer::Allow => Ok(true),
            GuardianAnswer::Deny => Ok(false),
            GuardianAnswer::Fail(msg) => Err((*msg).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Alert sync
// ---------------------------------------------------------------------------

/// Alert sync that records every reconciled dashboard and can be told to fail.
#[derive(Default)]
pub struct RecordingAlertSync {
    calls: Mutex<Vec<(DbId, DbId, DbId)>>,
    fail: Mutex<bool>,
}

impl RecordingAlertSync {
    pub fn fail(&self) {
        *self.fail.lock().unwrap() = true;
    }

    /// `(org_id, user_id, dashboard_id)` per reconcile call.
    pub fn calls(&self) -> Vec<(DbId, DbId, DbId)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AlertSync for RecordingAlertSync {
    async fn reconcile(
        &self,
        org_id: DbId,
        user_id: DbId,
        dashboard: &Dashboard,
    ) -> Result<(), BoxError> {
        self.calls
            .lock()
            .unwrap()
            .push((org_id, user_id, dashboard.id));
        if *self.fail.lock().unwrap() {
            return Err("alerting backend unavailable".into());
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Harness
// ---------------------------------------------------------------------------

pub const ORG_A: DbId = 1;
pub const ORG_B: DbId = 2;

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub guardian: Arc<ScriptedGuardian>,
    pub alerts: Arc<RecordingAlertSync>,
    pub service: DashboardService,
}

impl Harness {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::default());
        let guardian = Arc::new(ScriptedGuardian::new(GuardianAnswer::Allow));
        let alerts = Arc::new(RecordingAlertSync::default());
        let service = DashboardService::new(store.clone(), guardian.clone(), alerts.clone());
        Self {
            store,
            guardian,
            alerts,
            service,
        }
    }

    pub async fn insert_folder(&self, title: &str, org_id: DbId) -> Dashboard {
        let req = SaveDashboardRequest::new(title, editor(org_id)).as_folder();
        self.service.save_dashboard(req).await.unwrap()
    }

    pub async fn insert_dashboard(&self, title: &str, org_id: DbId, folder_id: DbId) -> Dashboard {
        let req = SaveDashboardRequest::new(title, editor(org_id)).in_folder(folder_id);
        self.service.save_dashboard(req).await.unwrap()
    }
}

pub fn editor(org_id: DbId) -> SignedInUser {
    SignedInUser::new(10_000, org_id, OrgRole::Editor)
}

/// Folders and dashboards saved in organization A.
pub struct Fixtures {
    pub saved_folder: Dashboard,
    pub saved_dash_in_folder: Dashboard,
    pub other_saved_dash_in_folder: Dashboard,
    pub saved_dash_in_general_folder: Dashboard,
    pub other_saved_folder: Dashboard,
}

pub async fn seed(h: &Harness) -> Fixtures {
    let saved_folder = h.insert_folder("Saved folder", ORG_A).await;
    let saved_dash_in_folder = h
        .insert_dashboard("Saved dash in folder", ORG_A, saved_folder.id)
        .await;
    let other_saved_dash_in_folder = h
        .insert_dashboard("Other saved dash in folder", ORG_A, saved_folder.id)
        .await;
    let saved_dash_in_general_folder = h
        .insert_dashboard("Saved dashboard in general folder", ORG_A, 0)
        .await;
    let other_saved_folder = h.insert_folder("Other saved folder", ORG_A).await;

    Fixtures {
        saved_folder,
        saved_dash_in_folder,
        other_saved_dash_in_folder,
        saved_dash_in_general_folder,
        other_saved_folder,
    }
}

/// A request from organization A's editor.
pub fn request(title: &str) -> SaveDashboardRequest {
    SaveDashboardRequest::new(title, editor(ORG_A))
}
