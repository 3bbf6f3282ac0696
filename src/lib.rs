#![no_std]
#![deny(unsafe_code)]
#![deny(clippy::dbg_macro, clippy::todo, clippy::unimplemented)]
use soroban_sdk::{
    contract, contracterror, contractimpl, contracttype, symbol_short, token, Address, Env,
    Symbol, Vec,
};

/// Centralized contract error codes. Auth failures on the claiming beneficiary
/// are signaled by host panic (require_auth).
#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
#[repr(u32)]
pub enum VestingError {
    /// Contract is already initialized (schedules are seeded exactly once).
    AlreadyInitialized = 1,
    /// Contract is not initialized (admin not set).
    NotInitialized = 2,
    /// Caller is not the administrator.
    NotAuthorized = 3,
    /// Schedule parameters are invalid (zero anchor timestamp, zero duration,
    /// non-positive supply, or TGE percent above 100).
    InvalidSchedule = 4,
    /// No schedule record exists for the given kind.
    ScheduleNotFound = 5,
    /// No beneficiary record exists for the given (schedule, address) pair.
    BeneficiaryNotFound = 6,
    /// A beneficiary record already exists for the (schedule, address) pair.
    /// Registration is strictly additive, never an update.
    BeneficiaryExists = 7,
    /// The beneficiary list passed to add_beneficiaries is empty.
    NoBeneficiaries = 8,
    /// Beneficiary and amount lists have different lengths.
    ArraysLengthMismatch = 9,
    /// Allocation or claim amount must be strictly positive.
    NonPositiveAmount = 10,
    /// Allocation sum would exceed the schedule's remaining total supply.
    TotalSupplyReached = 11,
    /// No claimable amount at the current ledger time.
    NothingToClaim = 12,
    /// Claim attempted before the schedule's linear-release start.
    VestingNotStarted = 13,
    /// Computed claim would push claimed past the total allocation. Indicates
    /// a calculator or data bug; never clamped.
    ClaimExceedsAllocation = 14,
    /// Checked arithmetic overflow (or division by zero).
    MathOverflow = 15,
    /// Payment token address has not been set.
    TokenNotSet = 16,
    /// Payment token address is already set and cannot be changed.
    TokenAlreadySet = 17,
}

// ── Event symbols ────────────────────────────────────────────
const EVENT_INIT: Symbol = symbol_short!("init");
const EVENT_SCHEDULE_SET: Symbol = symbol_short!("sched_set");
const EVENT_TOKEN_SET: Symbol = symbol_short!("tok_set");
const EVENT_BENEFICIARIES_ADDED: Symbol = symbol_short!("ben_added");
const EVENT_CLAIM: Symbol = symbol_short!("claim");
const EVENT_CLAIM_ALL: Symbol = symbol_short!("claim_all");

// ── Constants ────────────────────────────────────────────────

/// A vesting "month" is a fixed 30-day window, not a calendar month.
const SECONDS_PER_MONTH: u64 = 30 * 24 * 60 * 60;

/// Granularity at which linear vesting is quantized. Release amounts step
/// forward once per elapsed interval, never continuously.
pub const CLAIM_INTERVAL: u64 = SECONDS_PER_MONTH;

/// Token base units per whole token (18 decimals).
const TOKEN_SCALE: i128 = 1_000_000_000_000_000_000;

/// Denominator for TGE percentages (whole percent, 0-100).
const PERCENT_DENOMINATOR: i128 = 100;

const fn base_units(whole_tokens: i128) -> i128 {
    whole_tokens * TOKEN_SCALE
}

const fn months(n: u64) -> u64 {
    n * SECONDS_PER_MONTH
}

// ── Data structures ──────────────────────────────────────────

/// The canonical vesting categories. A closed sum type: a schedule kind that
/// is not one of these cannot be constructed, so "typo schedule name" lookups
/// are impossible by construction.
#[contracttype]
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ScheduleKind {
    Team,
    Foundation,
    AngelRound,
    SeedRound,
    PrivateRound1,
    PrivateRound2,
    Advisors,
    KolRound,
    Marketing,
    StakingRewards,
    EcosystemReserve,
    Airdrop,
    LiquidityPool,
    PublicAllocation,
}

impl ScheduleKind {
    pub(crate) const ALL: [ScheduleKind; 14] = [
        ScheduleKind::Team,
        ScheduleKind::Foundation,
        ScheduleKind::AngelRound,
        ScheduleKind::SeedRound,
        ScheduleKind::PrivateRound1,
        ScheduleKind::PrivateRound2,
        ScheduleKind::Advisors,
        ScheduleKind::KolRound,
        ScheduleKind::Marketing,
        ScheduleKind::StakingRewards,
        ScheduleKind::EcosystemReserve,
        ScheduleKind::Airdrop,
        ScheduleKind::LiquidityPool,
        ScheduleKind::PublicAllocation,
    ];
}

/// Per-category launch parameters: cliff duration, linear-release duration,
/// total supply (base units) and up-front TGE unlock percent.
struct ScheduleParams {
    cliff_duration: u64,
    duration: u64,
    total_supply: i128,
    tge_percent: u32,
}

/// Fixed launch configuration consumed by `initialize`. These are data, not
/// logic: the engine derives nothing from them beyond the four timestamps.
fn canonical_params(kind: ScheduleKind) -> ScheduleParams {
    let (cliff_months, duration_months, supply_tokens, tge_percent) = match kind {
        ScheduleKind::Team => (12, 24, 300_000_000, 0),
        ScheduleKind::Foundation => (0, 12, 220_000_000, 0),
        ScheduleKind::AngelRound => (6, 12, 20_000_000, 0),
        ScheduleKind::SeedRound => (10, 12, 40_000_000, 0),
        ScheduleKind::PrivateRound1 => (12, 12, 140_000_000, 0),
        ScheduleKind::PrivateRound2 => (6, 12, 60_000_000, 0),
        ScheduleKind::Advisors => (6, 12, 30_000_000, 0),
        ScheduleKind::KolRound => (3, 6, 30_000_000, 25),
        ScheduleKind::Marketing => (1, 18, 80_000_000, 10),
        ScheduleKind::StakingRewards => (3, 24, 180_000_000, 0),
        ScheduleKind::EcosystemReserve => (0, 150, 560_000_000, 2),
        ScheduleKind::Airdrop => (6, 9, 80_000_000, 10),
        ScheduleKind::LiquidityPool => (0, 6, 200_000_000, 25),
        ScheduleKind::PublicAllocation => (3, 6, 60_000_000, 25),
    };
    ScheduleParams {
        cliff_duration: months(cliff_months),
        duration: months(duration_months),
        total_supply: base_units(supply_tokens),
        tge_percent,
    }
}

/// One named vesting category. `total_supply` is the remaining allocatable
/// amount and is the only field mutated after creation (monotonically
/// decreasing as beneficiaries are registered, never below zero).
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingSchedule {
    pub total_supply: i128,
    /// Claiming yields zero at or before this moment.
    pub cliff_start_timestamp: u64,
    /// cliff_start_timestamp + cliff duration; linear release counts from here.
    pub start_timestamp: u64,
    /// start_timestamp + duration.
    pub end_timestamp: u64,
    /// Linear-release window length in seconds.
    pub duration: u64,
    /// Percent of an allocation unlocked once the cliff has passed (0-100).
    pub tge_percent: u32,
}

/// One beneficiary position within one schedule. `total_allocation` is fixed
/// at registration; `claimed_amount` is monotonically non-decreasing and
/// never exceeds the allocation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Beneficiary {
    pub total_allocation: i128,
    pub claimed_amount: i128,
}

/// A schedule record together with its cumulative paid-out counter.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VestingData {
    pub schedule: VestingSchedule,
    pub total_claimed: i128,
}

/// Per-schedule claimable amounts for one beneficiary, plus their sum.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimsOverview {
    pub total_amount: i128,
    pub schedules: Vec<ScheduleKind>,
    pub amounts: Vec<i128>,
}

/// Per-schedule total allocations for one beneficiary.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AllocationsOverview {
    pub schedules: Vec<ScheduleKind>,
    pub total_allocations: Vec<i128>,
}

/// Per-schedule linear-release durations for one beneficiary.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct DurationsOverview {
    pub schedules: Vec<ScheduleKind>,
    pub durations: Vec<u64>,
}

/// Per-schedule cumulative claimed amounts for one beneficiary.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ClaimedOverview {
    pub schedules: Vec<ScheduleKind>,
    pub claimed_amounts: Vec<i128>,
}

/// Storage keys. Schedules and counters are keyed by kind, beneficiary
/// records by (kind, address), and the per-user schedule index by address.
/// The persistence substrate is the single source of truth: every operation
/// re-reads from and re-writes to it, never an in-process cache.
#[contracttype]
pub enum DataKey {
    /// Administrator address; set once at initialization.
    Admin,
    /// Token contract paid out on claims; set once.
    PaymentToken,
    /// Schedule record per canonical kind.
    Schedule(ScheduleKind),
    /// Beneficiary record per (schedule, address) pair.
    Beneficiary(ScheduleKind, Address),
    /// Ordered, append-only list of schedules an address participates in.
    UserVestings(Address),
    /// Cumulative amount ever paid out for one schedule.
    TotalClaims(ScheduleKind),
    /// Cumulative amount ever paid out across all schedules.
    TotalClaimsAll,
}

// ── Vesting math (pure, no I/O) ──────────────────────────────

/// Up-front unlock: floor(total_allocation * tge_percent / 100).
pub(crate) fn initial_unlock(
    total_allocation: i128,
    tge_percent: u32,
) -> Result<i128, VestingError> {
    if total_allocation <= 0 {
        return Err(VestingError::NonPositiveAmount);
    }
    if tge_percent == 0 {
        return Ok(0);
    }
    total_allocation
        .checked_mul(tge_percent as i128)
        .ok_or(VestingError::MathOverflow)?
        .checked_div(PERCENT_DENOMINATOR)
        .ok_or(VestingError::MathOverflow)
}

/// Linearly released amount as of `now`, quantized to `claim_interval` steps.
///
/// Zero before `start_timestamp` and before the first full interval has
/// elapsed. Strictly after `start_timestamp + duration` the full remainder
/// (`total_allocation - initial_unlock`) is released; in between, release is
/// pro-rata over elapsed intervals with floor division and no remainder
/// redistribution, which makes the result a monotonically non-decreasing
/// step function of `now`.
pub(crate) fn linear_claimable(
    now: u64,
    total_allocation: i128,
    start_timestamp: u64,
    duration: u64,
    initial_unlock: i128,
    claim_interval: u64,
) -> Result<i128, VestingError> {
    if now < start_timestamp {
        return Ok(0);
    }
    let elapsed_intervals = (now - start_timestamp)
        .checked_div(claim_interval)
        .ok_or(VestingError::MathOverflow)?;
    if elapsed_intervals == 0 {
        return Ok(0);
    }
    let remainder = total_allocation
        .checked_sub(initial_unlock)
        .ok_or(VestingError::MathOverflow)?;
    let end = start_timestamp
        .checked_add(duration)
        .ok_or(VestingError::MathOverflow)?;
    if now > end {
        return Ok(remainder);
    }
    // elapsed_intervals >= 1 and now <= end together imply
    // duration >= claim_interval, so total_intervals >= 1 here.
    let total_intervals = duration / claim_interval;
    remainder
        .checked_mul(elapsed_intervals as i128)
        .ok_or(VestingError::MathOverflow)?
        .checked_div(total_intervals as i128)
        .ok_or(VestingError::MathOverflow)
}

// ── Contract ─────────────────────────────────────────────────
#[contract]
pub struct TokenVesting;

#[contractimpl]
impl TokenVesting {
    // ── storage helpers ───────────────────────────────────────

    fn read_admin(env: &Env) -> Result<Address, VestingError> {
        env.storage()
            .persistent()
            .get(&DataKey::Admin)
            .ok_or(VestingError::NotInitialized)
    }

    /// Authenticate `caller` and require it to be the stored administrator.
    fn require_admin(env: &Env, caller: &Address) -> Result<(), VestingError> {
        caller.require_auth();
        let admin = Self::read_admin(env)?;
        if *caller != admin {
            return Err(VestingError::NotAuthorized);
        }
        Ok(())
    }

    fn read_payment_token(env: &Env) -> Result<Address, VestingError> {
        env.storage()
            .persistent()
            .get(&DataKey::PaymentToken)
            .ok_or(VestingError::TokenNotSet)
    }

    fn read_schedule(env: &Env, kind: ScheduleKind) -> Result<VestingSchedule, VestingError> {
        env.storage()
            .persistent()
            .get(&DataKey::Schedule(kind))
            .ok_or(VestingError::ScheduleNotFound)
    }

    fn write_schedule(env: &Env, kind: ScheduleKind, schedule: &VestingSchedule) {
        env.storage()
            .persistent()
            .set(&DataKey::Schedule(kind), schedule);
    }

    fn read_beneficiary(
        env: &Env,
        kind: ScheduleKind,
        address: &Address,
    ) -> Result<Beneficiary, VestingError> {
        env.storage()
            .persistent()
            .get(&DataKey::Beneficiary(kind, address.clone()))
            .ok_or(VestingError::BeneficiaryNotFound)
    }

    fn write_beneficiary(
        env: &Env,
        kind: ScheduleKind,
        address: &Address,
        beneficiary: &Beneficiary,
    ) {
        env.storage()
            .persistent()
            .set(&DataKey::Beneficiary(kind, address.clone()), beneficiary);
    }

    fn has_beneficiary(env: &Env, kind: ScheduleKind, address: &Address) -> bool {
        env.storage()
            .persistent()
            .has(&DataKey::Beneficiary(kind, address.clone()))
    }

    fn read_user_vestings(env: &Env, address: &Address) -> Vec<ScheduleKind> {
        env.storage()
            .persistent()
            .get(&DataKey::UserVestings(address.clone()))
            .unwrap_or(Vec::new(env))
    }

    fn read_total_claims(env: &Env, kind: ScheduleKind) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalClaims(kind))
            .unwrap_or(0)
    }

    fn bump_total_claims(env: &Env, kind: ScheduleKind, amount: i128) -> Result<(), VestingError> {
        let total = Self::read_total_claims(env, kind)
            .checked_add(amount)
            .ok_or(VestingError::MathOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::TotalClaims(kind), &total);
        Ok(())
    }

    fn bump_total_claims_all(env: &Env, amount: i128) -> Result<(), VestingError> {
        let total: i128 = env
            .storage()
            .persistent()
            .get(&DataKey::TotalClaimsAll)
            .unwrap_or(0);
        let total = total.checked_add(amount).ok_or(VestingError::MathOverflow)?;
        env.storage()
            .persistent()
            .set(&DataKey::TotalClaimsAll, &total);
        Ok(())
    }

    /// Validate parameters, derive the four timestamps and persist a schedule
    /// record. Existence is guarded upstream by the `initialize` one-shot
    /// check; the registry itself does not re-check.
    fn create_schedule(
        env: &Env,
        kind: ScheduleKind,
        cliff_duration: u64,
        anchor_timestamp: u64,
        duration: u64,
        total_supply: i128,
        tge_percent: u32,
    ) -> Result<(), VestingError> {
        if anchor_timestamp == 0 || duration == 0 || total_supply <= 0 || tge_percent > 100 {
            return Err(VestingError::InvalidSchedule);
        }
        let start_timestamp = anchor_timestamp
            .checked_add(cliff_duration)
            .ok_or(VestingError::MathOverflow)?;
        let end_timestamp = start_timestamp
            .checked_add(duration)
            .ok_or(VestingError::MathOverflow)?;
        let schedule = VestingSchedule {
            total_supply,
            cliff_start_timestamp: anchor_timestamp,
            start_timestamp,
            end_timestamp,
            duration,
            tge_percent,
        };
        Self::write_schedule(env, kind, &schedule);
        env.events().publish(
            (EVENT_SCHEDULE_SET, kind),
            (cliff_duration, duration, total_supply, tge_percent),
        );
        Ok(())
    }

    /// Create the beneficiary record for one (schedule, address) pair and
    /// append the schedule to the address's vesting index.
    fn register_beneficiary(
        env: &Env,
        schedule: ScheduleKind,
        beneficiary: &Address,
        amount: i128,
    ) -> Result<(), VestingError> {
        if amount <= 0 {
            return Err(VestingError::NonPositiveAmount);
        }
        if Self::has_beneficiary(env, schedule, beneficiary) {
            return Err(VestingError::BeneficiaryExists);
        }
        Self::write_beneficiary(
            env,
            schedule,
            beneficiary,
            &Beneficiary {
                total_allocation: amount,
                claimed_amount: 0,
            },
        );
        let mut user_vestings = Self::read_user_vestings(env, beneficiary);
        user_vestings.push_back(schedule);
        env.storage()
            .persistent()
            .set(&DataKey::UserVestings(beneficiary.clone()), &user_vestings);
        Ok(())
    }

    /// Claimable amount for one position as of `now`. Operates on
    /// already-loaded records; touches no storage.
    ///
    /// Returns 0 both in the terminal state (fully claimed) and at or before
    /// the cliff; otherwise `linear + tge_unlock - claimed`, guarded so that
    /// a result pushing claimed past the allocation (or a negative result)
    /// fails instead of being clamped.
    fn compute_claimable(
        record: &Beneficiary,
        period: &VestingSchedule,
        now: u64,
    ) -> Result<i128, VestingError> {
        if record.claimed_amount == record.total_allocation {
            return Ok(0);
        }
        if now <= period.cliff_start_timestamp {
            return Ok(0);
        }
        let unlock = initial_unlock(record.total_allocation, period.tge_percent)?;
        let released = linear_claimable(
            now,
            record.total_allocation,
            period.start_timestamp,
            period.duration,
            unlock,
            CLAIM_INTERVAL,
        )?;
        let claimable = released
            .checked_add(unlock)
            .ok_or(VestingError::MathOverflow)?
            .checked_sub(record.claimed_amount)
            .ok_or(VestingError::MathOverflow)?;
        let projected = claimable
            .checked_add(record.claimed_amount)
            .ok_or(VestingError::MathOverflow)?;
        if claimable < 0 || projected > record.total_allocation {
            return Err(VestingError::ClaimExceedsAllocation);
        }
        Ok(claimable)
    }

    // ── initialization ────────────────────────────────────────

    /// Seed the 14 canonical schedules anchored at `start_timestamp` and
    /// store the administrator. Callable exactly once.
    pub fn initialize(env: Env, admin: Address, start_timestamp: u64) -> Result<(), VestingError> {
        if env.storage().persistent().has(&DataKey::Admin) {
            return Err(VestingError::AlreadyInitialized);
        }
        if start_timestamp == 0 {
            return Err(VestingError::InvalidSchedule);
        }
        env.storage().persistent().set(&DataKey::Admin, &admin);
        for kind in ScheduleKind::ALL {
            let params = canonical_params(kind);
            Self::create_schedule(
                &env,
                kind,
                params.cliff_duration,
                start_timestamp,
                params.duration,
                params.total_supply,
                params.tge_percent,
            )?;
        }
        env.events().publish((EVENT_INIT, admin), start_timestamp);
        Ok(())
    }

    /// Wire the token contract paid out on claims. Admin-only, one-time.
    pub fn set_payment_token(
        env: Env,
        caller: Address,
        payment_token: Address,
    ) -> Result<(), VestingError> {
        Self::require_admin(&env, &caller)?;
        if env.storage().persistent().has(&DataKey::PaymentToken) {
            return Err(VestingError::TokenAlreadySet);
        }
        env.storage()
            .persistent()
            .set(&DataKey::PaymentToken, &payment_token);
        env.events()
            .publish((EVENT_TOKEN_SET, caller), payment_token);
        Ok(())
    }

    // ── beneficiary registration ──────────────────────────────

    /// Register a batch of beneficiaries against one schedule, enforcing the
    /// schedule's remaining-supply ceiling and decrementing it by the batch
    /// sum. Any single failure aborts the whole batch: a contract invocation
    /// that returns `Err` rolls back every storage write, so no beneficiary
    /// is ever half-registered.
    pub fn add_beneficiaries(
        env: Env,
        caller: Address,
        schedule: ScheduleKind,
        beneficiaries: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), VestingError> {
        Self::require_admin(&env, &caller)?;
        let mut record = Self::read_schedule(&env, schedule)?;
        if beneficiaries.is_empty() {
            return Err(VestingError::NoBeneficiaries);
        }
        if beneficiaries.len() != amounts.len() {
            return Err(VestingError::ArraysLengthMismatch);
        }

        let mut total_allocated: i128 = 0;
        for i in 0..beneficiaries.len() {
            let beneficiary = beneficiaries.get_unchecked(i);
            let amount = amounts.get_unchecked(i);
            Self::register_beneficiary(&env, schedule, &beneficiary, amount)?;
            total_allocated = total_allocated
                .checked_add(amount)
                .ok_or(VestingError::MathOverflow)?;
        }

        if total_allocated > record.total_supply {
            return Err(VestingError::TotalSupplyReached);
        }
        record.total_supply = record
            .total_supply
            .checked_sub(total_allocated)
            .ok_or(VestingError::MathOverflow)?;
        Self::write_schedule(&env, schedule, &record);

        env.events().publish(
            (EVENT_BENEFICIARIES_ADDED, schedule),
            (beneficiaries.len(), total_allocated),
        );
        Ok(())
    }

    // ── claiming ──────────────────────────────────────────────

    /// Currently claimable amount for one (schedule, beneficiary) pair at the
    /// current ledger time. May legitimately be 0; never negative.
    pub fn claimable_amount(
        env: Env,
        schedule: ScheduleKind,
        beneficiary: Address,
    ) -> Result<i128, VestingError> {
        let record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
        let period = Self::read_schedule(&env, schedule)?;
        let now = env.ledger().timestamp();
        Self::compute_claimable(&record, &period, now)
    }

    /// Claim everything currently claimable for one schedule. Persists the
    /// new claimed amount, bumps both claim counters and transfers the
    /// tokens; a failed transfer panics in the host and rolls the whole
    /// invocation back, so the bookkeeping and the payout commit atomically.
    /// Returns the amount paid out.
    pub fn claim(
        env: Env,
        beneficiary: Address,
        schedule: ScheduleKind,
    ) -> Result<i128, VestingError> {
        beneficiary.require_auth();
        let payment_token = Self::read_payment_token(&env)?;

        let mut record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
        let period = Self::read_schedule(&env, schedule)?;
        if record.claimed_amount == record.total_allocation {
            return Err(VestingError::NothingToClaim);
        }

        let now = env.ledger().timestamp();
        let claimable = Self::compute_claimable(&record, &period, now)?;
        if claimable == 0 {
            if now < period.start_timestamp {
                return Err(VestingError::VestingNotStarted);
            }
            return Err(VestingError::NothingToClaim);
        }

        record.claimed_amount = record
            .claimed_amount
            .checked_add(claimable)
            .ok_or(VestingError::MathOverflow)?;
        Self::write_beneficiary(&env, schedule, &beneficiary, &record);
        Self::bump_total_claims(&env, schedule, claimable)?;
        Self::bump_total_claims_all(&env, claimable)?;

        token::Client::new(&env, &payment_token).transfer(
            &env.current_contract_address(),
            &beneficiary,
            &claimable,
        );

        env.events()
            .publish((EVENT_CLAIM, beneficiary.clone(), schedule), claimable);
        Ok(claimable)
    }

    /// Claim across every schedule the beneficiary participates in.
    ///
    /// Schedules whose claimable amount is 0 are skipped, not failed. The
    /// per-schedule bookkeeping, the single aggregate counter update and the
    /// single aggregate transfer commit together or not at all. Fails
    /// `NothingToClaim` only when the total across all schedules is 0.
    pub fn claim_all(env: Env, beneficiary: Address) -> Result<i128, VestingError> {
        beneficiary.require_auth();
        let payment_token = Self::read_payment_token(&env)?;

        let user_vestings = Self::read_user_vestings(&env, &beneficiary);
        let now = env.ledger().timestamp();
        let mut total_claimed: i128 = 0;

        for schedule in user_vestings.iter() {
            let mut record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
            let period = Self::read_schedule(&env, schedule)?;
            let claimable = Self::compute_claimable(&record, &period, now)?;
            if claimable == 0 {
                continue;
            }

            record.claimed_amount = record
                .claimed_amount
                .checked_add(claimable)
                .ok_or(VestingError::MathOverflow)?;
            Self::write_beneficiary(&env, schedule, &beneficiary, &record);
            Self::bump_total_claims(&env, schedule, claimable)?;
            total_claimed = total_claimed
                .checked_add(claimable)
                .ok_or(VestingError::MathOverflow)?;

            env.events()
                .publish((EVENT_CLAIM, beneficiary.clone(), schedule), claimable);
        }

        if total_claimed == 0 {
            return Err(VestingError::NothingToClaim);
        }
        Self::bump_total_claims_all(&env, total_claimed)?;

        token::Client::new(&env, &payment_token).transfer(
            &env.current_contract_address(),
            &beneficiary,
            &total_claimed,
        );

        env.events()
            .publish((EVENT_CLAIM_ALL, beneficiary), total_claimed);
        Ok(total_claimed)
    }

    // ── read-only views ───────────────────────────────────────

    pub fn admin(env: Env) -> Result<Address, VestingError> {
        Self::read_admin(&env)
    }

    pub fn payment_token(env: Env) -> Result<Address, VestingError> {
        Self::read_payment_token(&env)
    }

    pub fn get_schedule(
        env: Env,
        schedule: ScheduleKind,
    ) -> Result<VestingSchedule, VestingError> {
        Self::read_schedule(&env, schedule)
    }

    /// A schedule record together with its cumulative paid-out counter.
    pub fn get_vesting_data(
        env: Env,
        schedule: ScheduleKind,
    ) -> Result<VestingData, VestingError> {
        let record = Self::read_schedule(&env, schedule)?;
        let total_claimed = Self::read_total_claims(&env, schedule);
        Ok(VestingData {
            schedule: record,
            total_claimed,
        })
    }

    pub fn get_beneficiary(
        env: Env,
        schedule: ScheduleKind,
        beneficiary: Address,
    ) -> Result<Beneficiary, VestingError> {
        Self::read_beneficiary(&env, schedule, &beneficiary)
    }

    /// Schedules the beneficiary participates in, in registration order.
    pub fn get_user_vestings(env: Env, beneficiary: Address) -> Vec<ScheduleKind> {
        Self::read_user_vestings(&env, &beneficiary)
    }

    /// Claimable amounts across all of the beneficiary's schedules at the
    /// current ledger time, plus their sum. Read-only counterpart to
    /// `claim_all`.
    pub fn get_claims_for_all_vestings(
        env: Env,
        beneficiary: Address,
    ) -> Result<ClaimsOverview, VestingError> {
        let schedules = Self::read_user_vestings(&env, &beneficiary);
        let now = env.ledger().timestamp();
        let mut amounts = Vec::new(&env);
        let mut total_amount: i128 = 0;
        for schedule in schedules.iter() {
            let record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
            let period = Self::read_schedule(&env, schedule)?;
            let claimable = Self::compute_claimable(&record, &period, now)?;
            total_amount = total_amount
                .checked_add(claimable)
                .ok_or(VestingError::MathOverflow)?;
            amounts.push_back(claimable);
        }
        Ok(ClaimsOverview {
            total_amount,
            schedules,
            amounts,
        })
    }

    pub fn get_allocations_for_all_vestings(
        env: Env,
        beneficiary: Address,
    ) -> Result<AllocationsOverview, VestingError> {
        let schedules = Self::read_user_vestings(&env, &beneficiary);
        let mut total_allocations = Vec::new(&env);
        for schedule in schedules.iter() {
            let record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
            total_allocations.push_back(record.total_allocation);
        }
        Ok(AllocationsOverview {
            schedules,
            total_allocations,
        })
    }

    pub fn get_vestings_duration(
        env: Env,
        beneficiary: Address,
    ) -> Result<DurationsOverview, VestingError> {
        let schedules = Self::read_user_vestings(&env, &beneficiary);
        let mut durations = Vec::new(&env);
        for schedule in schedules.iter() {
            let period = Self::read_schedule(&env, schedule)?;
            durations.push_back(period.duration);
        }
        Ok(DurationsOverview {
            schedules,
            durations,
        })
    }

    pub fn get_claimed_for_all_vestings(
        env: Env,
        beneficiary: Address,
    ) -> Result<ClaimedOverview, VestingError> {
        let schedules = Self::read_user_vestings(&env, &beneficiary);
        let mut claimed_amounts = Vec::new(&env);
        for schedule in schedules.iter() {
            let record = Self::read_beneficiary(&env, schedule, &beneficiary)?;
            claimed_amounts.push_back(record.claimed_amount);
        }
        Ok(ClaimedOverview {
            schedules,
            claimed_amounts,
        })
    }

    /// Cumulative amount ever paid out for one schedule.
    pub fn total_claims(env: Env, schedule: ScheduleKind) -> i128 {
        Self::read_total_claims(&env, schedule)
    }

    /// Cumulative amount ever paid out across all schedules.
    pub fn total_claims_all(env: Env) -> i128 {
        env.storage()
            .persistent()
            .get(&DataKey::TotalClaimsAll)
            .unwrap_or(0)
    }
}

mod test_auth;
