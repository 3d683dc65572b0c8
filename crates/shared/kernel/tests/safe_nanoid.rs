use beans_kernel::{SAFE_ALPHABET, bean_id, safe_nanoid};

#[test]
fn generates_expected_length_and_charset() {
    let id = safe_nanoid!();
    assert_eq!(id.len(), 12);

    for ch in id.chars() {
        assert!(SAFE_ALPHABET.contains(&ch), "unexpected character in nanoid: {ch}");
    }
}

#[test]
fn custom_length() {
    let id = safe_nanoid!(20);
    assert_eq!(id.len(), 20);
}

#[test]
fn bean_ids_carry_kind_and_safe_suffix() {
    let id = bean_id("slider");
    assert_eq!(id.kind(), Some("slider"));

    let (_, suffix) = id.as_str().split_once(':').unwrap();
    assert_eq!(suffix.len(), 12);
    assert!(suffix.chars().all(|ch| SAFE_ALPHABET.contains(&ch)));
}

#[test]
fn bean_ids_are_distinct() {
    assert_ne!(bean_id("slider"), bean_id("slider"));
}
