//! 令牌签发与验证测试

mod common;

use chatroom_system::auth::jwt::{TokenError, TokenType};
use chatroom_system::models::role::Role;

#[test]
fn test_access_token_roundtrip() {
    let service = common::create_jwt_service();
    let obfuscator = common::create_obfuscator();
    let subject = obfuscator.encode(42);

    let token = service
        .issue_access_token(&subject, "alice", vec![Role::User], 0)
        .unwrap();

    let claims = service.validate_access_token(&token).unwrap();
    assert_eq!(claims.sub, subject);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.token_type, TokenType::Access);
    assert_eq!(claims.roles, vec![Role::User]);
    assert_eq!(claims.epoch, 0);
    assert!(claims.exp > claims.iat);

    // sub 中是公开ID，解码后得到内部ID
    assert_eq!(obfuscator.decode(&claims.sub).unwrap(), 42);
}

#[test]
fn test_refresh_token_roundtrip() {
    let service = common::create_jwt_service();

    let token = service
        .issue_refresh_token("o4kaRaNwQ2", "alice", vec![Role::User], 7)
        .unwrap();

    let claims = service.validate_refresh_token(&token).unwrap();
    assert_eq!(claims.token_type, TokenType::Refresh);
    assert_eq!(claims.epoch, 7);
}

#[test]
fn test_token_pair_shares_subject_and_epoch() {
    let service = common::create_jwt_service();

    let pair = service
        .issue_token_pair("o4kaRaNwQ2", "alice", vec![Role::User, Role::Admin], 3)
        .unwrap();

    assert_eq!(pair.expires_in, 300);

    let access = service.validate_access_token(&pair.access_token).unwrap();
    let refresh = service.validate_refresh_token(&pair.refresh_token).unwrap();

    assert_eq!(access.sub, refresh.sub);
    assert_eq!(access.epoch, refresh.epoch);
    assert_eq!(access.roles, refresh.roles);
    // 两个令牌各自有独立的 jti
    assert_ne!(access.jti, refresh.jti);
}

#[test]
fn test_access_token_rejected_where_refresh_expected() {
    let service = common::create_jwt_service();

    let access = service
        .issue_access_token("o4kaRaNwQ2", "alice", vec![], 0)
        .unwrap();

    assert_eq!(
        service.validate_refresh_token(&access).unwrap_err(),
        TokenError::WrongTokenType
    );
}

#[test]
fn test_refresh_token_rejected_where_access_expected() {
    let service = common::create_jwt_service();

    let refresh = service
        .issue_refresh_token("o4kaRaNwQ2", "alice", vec![], 0)
        .unwrap();

    assert_eq!(
        service.validate_access_token(&refresh).unwrap_err(),
        TokenError::WrongTokenType
    );
}

#[test]
fn test_tampered_token_is_malformed() {
    let service = common::create_jwt_service();

    let token = service
        .issue_access_token("o4kaRaNwQ2", "alice", vec![Role::User], 0)
        .unwrap();

    // 破坏签名部分
    let mut tampered = token.clone();
    let flipped = if tampered.ends_with('a') { 'b' } else { 'a' };
    tampered.pop();
    tampered.push(flipped);

    assert_eq!(service.validate(&tampered).unwrap_err(), TokenError::Malformed);
}

#[test]
fn test_garbage_is_malformed() {
    let service = common::create_jwt_service();

    assert_eq!(service.validate("garbage").unwrap_err(), TokenError::Malformed);
    assert_eq!(
        service.validate("a.b.c").unwrap_err(),
        TokenError::Malformed
    );
}
