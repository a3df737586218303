use bytes::Bytes;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use time::OffsetDateTime;
use tokio::task;

use crate::error::{AppError, AppResult};
use crate::ports::outgoing::{
    credit_store::CreditStorePort,
    generation_engine::GenerationEnginePort,
    generation_ledger::{GenerationLedgerPort, GenerationSettlement},
    identity_provider::{AuthorizationRequest, IdentityProviderPort},
    media_asset_store::MediaAssetStorePort,
    user_store::UserStorePort,
};
use domain::credits::CreditBalance;
use domain::media::{GeneratedAssetRef, MediaAsset, MediaAssetId, NewMediaAsset};
use domain::user::{IdentityProfile, NewUser, User, UserId};

#[derive(Default)]
struct StoreState {
    next_user_id: i64,
    next_asset_id: i64,
    users: BTreeMap<i64, User>,
    balances: HashMap<i64, CreditBalance>,
    assets: Vec<MediaAsset>,
}

/// One store backing every persistence port, so tests can observe users,
/// balances and assets together the way a single database would.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
    fail_ledger_updates: AtomicBool,
    fail_asset_inserts: AtomicBool,
    fail_reads: AtomicBool,
    stale_email_lookups: AtomicUsize,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, email: &str, balance: Option<i64>) -> UserId {
        let mut state = self.state.lock().unwrap();
        state.next_user_id += 1;
        let id = UserId(state.next_user_id);
        state.users.insert(
            id.as_i64(),
            User {
                id,
                external_id: format!("ext-{}", id),
                email: email.to_string(),
                display_name: email.split('@').next().unwrap_or_default().to_string(),
                avatar_url: String::new(),
            },
        );
        if let Some(balance) = balance {
            state.balances.insert(
                id.as_i64(),
                CreditBalance::new(id, balance, OffsetDateTime::now_utc()),
            );
        }
        id
    }

    pub fn balance_of(&self, user_id: UserId) -> Option<i64> {
        let state = self.state.lock().unwrap();
        state.balances.get(&user_id.as_i64()).map(|b| b.balance)
    }

    pub fn assets_of(&self, user_id: UserId) -> Vec<MediaAsset> {
        let state = self.state.lock().unwrap();
        state
            .assets
            .iter()
            .filter(|asset| asset.owner == user_id)
            .cloned()
            .collect()
    }

    pub fn user_by_email(&self, email: &str) -> Option<User> {
        let state = self.state.lock().unwrap();
        state.users.values().find(|u| u.email == email).cloned()
    }

    pub fn user_count(&self) -> usize {
        self.state.lock().unwrap().users.len()
    }

    pub fn fail_ledger_updates(&self) {
        self.fail_ledger_updates.store(true, Ordering::SeqCst);
    }

    pub fn fail_asset_inserts(&self) {
        self.fail_asset_inserts.store(true, Ordering::SeqCst);
    }

    pub fn fail_reads(&self) {
        self.fail_reads.store(true, Ordering::SeqCst);
    }

    /// The next `count` email lookups miss, as if another request registered
    /// the address between lookup and insert.
    pub fn miss_next_email_lookups(&self, count: usize) {
        self.stale_email_lookups.store(count, Ordering::SeqCst);
    }

    fn check_reads(&self) -> AppResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError {
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn push_asset(state: &mut StoreState, asset: &NewMediaAsset) -> MediaAsset {
        state.next_asset_id += 1;
        let stored = MediaAsset {
            id: MediaAssetId(state.next_asset_id),
            owner: asset.owner,
            filename: asset.filename.clone(),
            content_type: asset.content_type.clone(),
            url: asset.url.clone(),
            created_at: OffsetDateTime::now_utc(),
        };
        state.assets.push(stored.clone());
        stored
    }
}

#[async_trait::async_trait]
impl UserStorePort for InMemoryStore {
    async fn find_user_by_id(&self, id: &UserId) -> AppResult<Option<User>> {
        self.check_reads()?;
        Ok(self.state.lock().unwrap().users.get(&id.as_i64()).cloned())
    }

    async fn find_user_by_email(&self, email: &str) -> AppResult<Option<User>> {
        self.check_reads()?;
        let stale = self
            .stale_email_lookups
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if stale {
            return Ok(None);
        }
        Ok(self.user_by_email(email))
    }

    async fn create_user_with_credits(
        &self,
        new_user: &NewUser,
        initial_credits: i64,
    ) -> AppResult<User> {
        let mut state = self.state.lock().unwrap();
        if state.users.values().any(|u| u.email == new_user.email) {
            return Err(AppError::Conflict {
                message: format!("User with email {} already exists", new_user.email),
            });
        }
        state.next_user_id += 1;
        let id = UserId(state.next_user_id);
        let user = User {
            id,
            external_id: new_user.external_id.clone(),
            email: new_user.email.clone(),
            display_name: new_user.display_name.clone(),
            avatar_url: new_user.avatar_url.clone(),
        };
        state.users.insert(id.as_i64(), user.clone());
        state.balances.insert(
            id.as_i64(),
            CreditBalance::new(id, initial_credits, OffsetDateTime::now_utc()),
        );
        Ok(user)
    }

    async fn delete_user(&self, id: &UserId) -> AppResult<()> {
        let mut state = self.state.lock().unwrap();
        if state.users.remove(&id.as_i64()).is_none() {
            return Err(AppError::NotFound {
                message: format!("User {} not found", id),
            });
        }
        state.balances.remove(&id.as_i64());
        state.assets.retain(|asset| asset.owner != *id);
        Ok(())
    }
}

#[async_trait::async_trait]
impl CreditStorePort for InMemoryStore {
    async fn get_balance(&self, user_id: &UserId) -> AppResult<CreditBalance> {
        self.check_reads()?;
        self.state
            .lock()
            .unwrap()
            .balances
            .get(&user_id.as_i64())
            .cloned()
            .ok_or_else(|| AppError::NotFound {
                message: format!("No credits for user {}", user_id),
            })
    }

    async fn create_initial(&self, user_id: &UserId, amount: i64) -> AppResult<UserId> {
        let mut state = self.state.lock().unwrap();
        if state.balances.contains_key(&user_id.as_i64()) {
            return Err(AppError::Conflict {
                message: format!("Credits already exist for user {}", user_id),
            });
        }
        state.balances.insert(
            user_id.as_i64(),
            CreditBalance::new(*user_id, amount, OffsetDateTime::now_utc()),
        );
        Ok(*user_id)
    }

    async fn set_balance(&self, user_id: &UserId, new_balance: i64) -> AppResult<()> {
        if self.fail_ledger_updates.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError {
                message: "update failed".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        let balance = state
            .balances
            .get_mut(&user_id.as_i64())
            .ok_or_else(|| AppError::NotFound {
                message: format!("No credits for user {}", user_id),
            })?;
        balance.balance = new_balance;
        balance.updated_at = OffsetDateTime::now_utc();
        Ok(())
    }
}

#[async_trait::async_trait]
impl MediaAssetStorePort for InMemoryStore {
    async fn record(&self, asset: &NewMediaAsset) -> AppResult<MediaAsset> {
        if self.fail_asset_inserts.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError {
                message: "insert failed".to_string(),
            });
        }
        let mut state = self.state.lock().unwrap();
        Ok(Self::push_asset(&mut state, asset))
    }

    async fn list_by_owner(&self, owner: &UserId) -> AppResult<Vec<MediaAsset>> {
        self.check_reads()?;
        Ok(self.assets_of(*owner))
    }
}

#[async_trait::async_trait]
impl GenerationLedgerPort for InMemoryStore {
    async fn settle_generation(
        &self,
        user_id: &UserId,
        cost: i64,
        asset: &NewMediaAsset,
    ) -> AppResult<GenerationSettlement> {
        let mut state = self.state.lock().unwrap();
        let now = OffsetDateTime::now_utc();

        let mut balance = state
            .balances
            .get(&user_id.as_i64())
            .cloned()
            .ok_or(AppError::NoCreditsRecord { user_id: *user_id })?;

        if self.fail_ledger_updates.load(Ordering::SeqCst) {
            return Err(AppError::LedgerUpdateFailed {
                message: "update failed".to_string(),
            });
        }

        balance
            .spend(cost, now)
            .map_err(|err| AppError::InsufficientCredits {
                message: err.to_string(),
            })?;

        if self.fail_asset_inserts.load(Ordering::SeqCst) {
            return Err(AppError::AssetRecordFailed {
                message: "insert failed".to_string(),
            });
        }

        let remaining_credits = balance.balance;
        state.balances.insert(user_id.as_i64(), balance);
        let stored = Self::push_asset(&mut state, asset);

        Ok(GenerationSettlement {
            remaining_credits,
            asset: stored,
        })
    }
}

pub enum EngineBehavior {
    Reference(String),
    Fail(String),
}

/// Generation engine double that counts calls.
pub struct StubGenerationEngine {
    behavior: EngineBehavior,
    calls: AtomicUsize,
    last_body: Mutex<Option<Bytes>>,
}

impl StubGenerationEngine {
    pub fn returning(reference: &str) -> Self {
        Self::with_behavior(EngineBehavior::Reference(reference.to_string()))
    }

    pub fn failing(message: &str) -> Self {
        Self::with_behavior(EngineBehavior::Fail(message.to_string()))
    }

    fn with_behavior(behavior: EngineBehavior) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
            last_body: Mutex::new(None),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_body(&self) -> Option<Bytes> {
        self.last_body.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl GenerationEnginePort for StubGenerationEngine {
    async fn generate(&self, request_body: Bytes) -> AppResult<GeneratedAssetRef> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_body.lock().unwrap() = Some(request_body);
        // Give concurrent callers a chance to interleave between check and debit.
        task::yield_now().await;

        match &self.behavior {
            EngineBehavior::Reference(reference) if call == 0 => {
                Ok(GeneratedAssetRef::new(reference.clone())?)
            }
            EngineBehavior::Reference(reference) => {
                Ok(GeneratedAssetRef::new(format!("{reference}-{call}"))?)
            }
            EngineBehavior::Fail(message) => Err(AppError::UpstreamError {
                message: message.clone(),
            }),
        }
    }
}

pub struct StubIdentityProvider {
    profile: Option<IdentityProfile>,
}

impl StubIdentityProvider {
    pub fn with_profile(profile: IdentityProfile) -> Self {
        Self {
            profile: Some(profile),
        }
    }

    pub fn rejecting() -> Self {
        Self { profile: None }
    }
}

#[async_trait::async_trait]
impl IdentityProviderPort for StubIdentityProvider {
    fn authorization_request(&self) -> AppResult<AuthorizationRequest> {
        Ok(AuthorizationRequest {
            authorize_url: "https://accounts.example.com/consent?state=csrf".to_string(),
            csrf_state: "csrf".to_string(),
            pkce_verifier: "verifier".to_string(),
        })
    }

    async fn exchange_code(&self, code: &str, _pkce_verifier: &str) -> AppResult<IdentityProfile> {
        self.profile
            .clone()
            .ok_or_else(|| AppError::ExternalServiceError {
                message: format!("code {code} rejected"),
            })
    }
}
