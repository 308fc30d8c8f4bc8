use staybook::staybook_auth::{
    create_access_token, create_refresh_token, verify_refresh_token, verify_token,
};
use staybook::staybook_config::JwtConfig;

fn get_test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "test_secret_key_for_testing_purposes".to_string(),
        refresh_secret: "test_refresh_secret_for_testing_purposes".to_string(),
        access_token_expiry: 3600,
        refresh_token_expiry: 604800,
        refresh_record_expiry: 2592000,
        verification_record_expiry: 604800,
    }
}

#[test]
fn test_access_token_carries_identity() {
    let jwt_config = get_test_jwt_config();
    let roles = vec!["user".to_string(), "manager".to_string()];

    let token = create_access_token(42, "alice", roles.clone(), &jwt_config).unwrap();
    let claims = verify_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, 42);
    assert_eq!(claims.username, "alice");
    assert_eq!(claims.roles, roles);
    assert_eq!(claims.exp - claims.iat, 3600);
}

#[test]
fn test_refresh_token_lifetime() {
    let jwt_config = get_test_jwt_config();

    let token = create_refresh_token(42, &jwt_config).unwrap();
    let claims = verify_refresh_token(&token, &jwt_config).unwrap();

    assert_eq!(claims.sub, 42);
    assert_eq!(claims.exp - claims.iat, 604800);
}

#[test]
fn test_secrets_are_not_interchangeable() {
    let jwt_config = get_test_jwt_config();
    let access = create_access_token(7, "bob", vec![], &jwt_config).unwrap();
    let refresh = create_refresh_token(7, &jwt_config).unwrap();

    assert!(verify_token(&refresh, &jwt_config).is_err());
    assert!(verify_refresh_token(&access, &jwt_config).is_err());
}

#[test]
fn test_other_deployment_secret_rejected() {
    let jwt_config = get_test_jwt_config();
    let mut other = get_test_jwt_config();
    other.secret = "another_deployment_secret".to_string();

    let token = create_access_token(1, "alice", vec![], &other).unwrap();
    assert!(verify_token(&token, &jwt_config).is_err());
}

#[test]
fn test_garbage_rejected() {
    let jwt_config = get_test_jwt_config();

    assert!(verify_token("", &jwt_config).is_err());
    assert!(verify_token("invalid.token.here", &jwt_config).is_err());
    assert!(verify_refresh_token("not-a-jwt", &jwt_config).is_err());
}
