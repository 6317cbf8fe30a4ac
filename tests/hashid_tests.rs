//! 公开ID混淆测试

use chatroom_system::auth::hashid::{DecodeError, IdObfuscator};

fn obfuscator() -> IdObfuscator {
    IdObfuscator::new("test-hashid-salt", 10).unwrap()
}

#[test]
fn test_roundtrip_over_range() {
    let obfuscator = obfuscator();

    for id in 1..=1000_i64 {
        let encoded = obfuscator.encode(id);
        assert_eq!(obfuscator.decode(&encoded).unwrap(), id, "roundtrip failed for {}", id);
    }

    for id in [1_000_000_i64, 4_294_967_296, i64::MAX / 4] {
        let encoded = obfuscator.encode(id);
        assert_eq!(obfuscator.decode(&encoded).unwrap(), id);
    }
}

#[test]
fn test_encodings_are_injective() {
    let obfuscator = obfuscator();

    let mut seen = std::collections::HashSet::new();
    for id in 1..=1000_i64 {
        assert!(seen.insert(obfuscator.encode(id)), "duplicate encoding for {}", id);
    }
}

#[test]
fn test_minimum_length_is_respected() {
    let obfuscator = obfuscator();

    for id in [1_i64, 9, 42, 12345] {
        assert!(obfuscator.encode(id).len() >= 10);
    }

    // 更长的最小长度配置同样生效
    let long = IdObfuscator::new("test-hashid-salt", 20).unwrap();
    assert!(long.encode(1).len() >= 20);
}

#[test]
fn test_decode_garbage_returns_error() {
    let obfuscator = obfuscator();

    assert_eq!(obfuscator.decode("not-a-real-code"), Err(DecodeError::Malformed));
    assert_eq!(obfuscator.decode(""), Err(DecodeError::Malformed));
    assert_eq!(obfuscator.decode("   "), Err(DecodeError::Malformed));
    assert_eq!(obfuscator.decode("中文输入"), Err(DecodeError::Malformed));
}

#[test]
fn test_salt_changes_the_mapping() {
    let a = IdObfuscator::new("salt-number-one", 10).unwrap();
    let b = IdObfuscator::new("salt-number-two", 10).unwrap();

    for id in 1..=50_i64 {
        assert_ne!(a.encode(id), b.encode(id), "salts must yield distinct encodings");
    }
}

#[test]
fn test_stable_salt_means_stable_encoding() {
    // 同一盐的两个实例（如进程重启前后）给出相同的公开ID
    let before = IdObfuscator::new("stable-salt-value", 10).unwrap();
    let after = IdObfuscator::new("stable-salt-value", 10).unwrap();

    for id in [1_i64, 42, 999_999] {
        assert_eq!(before.encode(id), after.encode(id));
        assert_eq!(after.decode(&before.encode(id)).unwrap(), id);
    }
}
