#![cfg(test)]
use soroban_sdk::{testutils::Address as _, vec, Address, Env};

use crate::{ScheduleKind, TokenVesting, TokenVestingClient, VestingError};

const START: u64 = 1_700_000_000;

fn make_client() -> (Env, TokenVestingClient<'static>, Address) {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register_contract(None, TokenVesting);
    let client = TokenVestingClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin, &START);
    (env, client, admin)
}

#[test]
fn add_beneficiaries_rejects_non_admin() {
    let (env, client, _admin) = make_client();
    let intruder = Address::generate(&env);
    let ben = Address::generate(&env);
    assert_eq!(
        client.try_add_beneficiaries(
            &intruder,
            &ScheduleKind::SeedRound,
            &vec![&env, ben.clone()],
            &vec![&env, 1_000],
        ),
        Err(Ok(VestingError::NotAuthorized))
    );
    // the rejected batch must not have registered anyone
    assert!(client
        .try_get_beneficiary(&ScheduleKind::SeedRound, &ben)
        .is_err());
}

#[test]
fn set_payment_token_rejects_non_admin() {
    let (env, client, _admin) = make_client();
    let intruder = Address::generate(&env);
    let payment_token = Address::generate(&env);
    assert_eq!(
        client.try_set_payment_token(&intruder, &payment_token),
        Err(Ok(VestingError::NotAuthorized))
    );
    assert!(client.try_payment_token().is_err());
}

#[test]
fn admin_view_returns_stored_admin() {
    let (_env, client, admin) = make_client();
    assert_eq!(client.admin(), admin);
}

#[test]
fn operations_before_initialize_fail_not_initialized() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register_contract(None, TokenVesting);
    let client = TokenVestingClient::new(&env, &contract_id);
    let caller = Address::generate(&env);
    let ben = Address::generate(&env);

    assert_eq!(
        client.try_add_beneficiaries(
            &caller,
            &ScheduleKind::SeedRound,
            &vec![&env, ben.clone()],
            &vec![&env, 1_000],
        ),
        Err(Ok(VestingError::NotInitialized))
    );
    assert_eq!(
        client.try_set_payment_token(&caller, &ben),
        Err(Ok(VestingError::NotInitialized))
    );
    assert!(client.try_admin().is_err());
    assert!(client.try_get_schedule(&ScheduleKind::SeedRound).is_err());
}

#[test]
fn claim_requires_a_beneficiary_record() {
    let (env, client, admin) = make_client();
    let token_admin = Address::generate(&env);
    let sac = env.register_stellar_asset_contract_v2(token_admin);
    let payment_token = sac.address().clone();
    client.set_payment_token(&admin, &payment_token);

    let stranger = Address::generate(&env);
    assert_eq!(
        client.try_claim(&stranger, &ScheduleKind::Foundation),
        Err(Ok(VestingError::BeneficiaryNotFound))
    );
}

#[test]
fn claim_without_authorization_fails() {
    let env = Env::default();
    env.mock_all_auths();
    let contract_id = env.register_contract(None, TokenVesting);
    let client = TokenVestingClient::new(&env, &contract_id);
    let admin = Address::generate(&env);
    client.initialize(&admin, &START);
    let ben = Address::generate(&env);
    client.add_beneficiaries(
        &admin,
        &ScheduleKind::Foundation,
        &vec![&env, ben.clone()],
        &vec![&env, 1_200],
    );

    // drop the auth mock: the host must reject the claim before the
    // contract body runs
    env.set_auths(&[]);
    assert!(client.try_claim(&ben, &ScheduleKind::Foundation).is_err());
}
