//! 授权判定测试

use chatroom_system::auth::middleware::role_gate;
use chatroom_system::models::role::{parse_roles, Role};

#[test]
fn test_empty_allowed_set_grants_any_authenticated_subject() {
    assert!(role_gate(&[Role::Guest], &[]));
    assert!(role_gate(&[Role::User], &[]));
    assert!(role_gate(&[Role::Admin], &[]));
    // 无角色的已认证用户同样放行
    assert!(role_gate(&[], &[]));
}

#[test]
fn test_registered_user_denied_on_admin_resource() {
    assert!(!role_gate(&[Role::User], &[Role::Admin]));
}

#[test]
fn test_intersection_grants() {
    assert!(role_gate(&[Role::User], &[Role::User, Role::Admin]));
    assert!(role_gate(&[Role::Guest, Role::Admin], &[Role::Admin]));
}

#[test]
fn test_no_intersection_denies() {
    assert!(!role_gate(&[Role::Guest], &[Role::User, Role::Admin]));
    assert!(!role_gate(&[], &[Role::User]));
}

#[test]
fn test_roles_parse_from_storage_form() {
    let stored = vec!["user".to_string(), "admin".to_string()];
    let roles = parse_roles(&stored);

    assert!(role_gate(&roles, &[Role::Admin]));
    assert!(!role_gate(&parse_roles(&["guest".to_string()]), &[Role::Admin]));
}

#[test]
fn test_unknown_stored_roles_do_not_grant_anything() {
    // 存储中出现未知角色名时直接忽略，不映射到任何已知角色
    let roles = parse_roles(&["root".to_string(), "superadmin".to_string()]);
    assert!(roles.is_empty());
    assert!(!role_gate(&roles, &[Role::Admin]));
    assert!(role_gate(&roles, &[]));
}
