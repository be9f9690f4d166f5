//! Certificate identifier parsing.
//!
//! Tests cover: digit-run selection (8+ rule, longest fallback, leftmost
//! tie), station / sequence / period / type splits, the 10-digit window,
//! trimming, and the two failure modes.

use rego_core::{cert_id::CertificateId, error::CertIdError};

fn parse(s: &str) -> CertificateId {
    CertificateId::parse(s).unwrap_or_else(|e| panic!("{s:?} should parse: {e}"))
}

// ─────────────────────────────────────────────────────────────────────────────
// Registry-shaped identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn registry_identifier_splits_into_four_parts() {
    let id = parse("G00003RPSGB0000104520010425300425GEN");
    assert_eq!(id.station, "G00003RPSGB");
    assert_eq!(id.sequence, 104_520);
    assert_eq!(id.period, "010425300425");
    assert_eq!(id.cert_type, "GEN");
    assert_eq!(id.full_id, "G00003RPSGB0000104520010425300425GEN");
    assert_eq!(id.cohort_key(), "G00003RPSGB_010425300425_GEN");
}

#[test]
fn parsing_is_deterministic() {
    let raw = "G00003RPSGB0000104520010425300425GEN";
    assert_eq!(parse(raw), parse(raw));
    assert_eq!(raw.parse::<CertificateId>().unwrap(), parse(raw));
}

#[test]
fn surrounding_whitespace_is_trimmed() {
    let padded = parse("  STATIONXYZ00001234560125GEN \t");
    let bare = parse("STATIONXYZ00001234560125GEN");
    assert_eq!(padded, bare);
    assert_eq!(padded.full_id, "STATIONXYZ00001234560125GEN");
}

#[test]
fn all_zero_sequence_is_zero() {
    assert_eq!(parse("STATIONXYZ00000000000125GEN").sequence, 0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Digit-run selection
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn eight_digit_run_beats_earlier_shorter_run() {
    // 7-digit run first, 8-digit run second.
    let id = parse("AB1234567CD87654321EFGHIJ");
    assert_eq!(id.station, "AB1234567CD");
    assert_eq!(id.sequence, 87_654_321);
}

#[test]
fn nine_and_ten_digit_runs_are_preferred_regardless_of_position() {
    let nine = parse("X12Y123456789ZZZZZZZZZZ");
    assert_eq!(nine.station, "X12Y");
    assert_eq!(nine.sequence, 123_456_789);

    let ten = parse("1234567X1234567890ABCDEF");
    assert_eq!(ten.station, "1234567X");
    assert_eq!(ten.sequence, 1_234_567_890);
}

#[test]
fn seven_then_twelve_picks_the_twelve() {
    let id = parse("AB1234567CD123456789012EFGH");
    assert_eq!(id.station, "AB1234567CD");
    // Only the first 10 digits count.
    assert_eq!(id.sequence, 1_234_567_890);
    assert_eq!(id.period, "12");
    assert_eq!(id.cert_type, "EFGH");
}

#[test]
fn twelve_then_seven_picks_the_twelve() {
    let id = parse("AB123456789012CD1234567EFGH");
    assert_eq!(id.station, "AB");
    assert_eq!(id.sequence, 1_234_567_890);
    // Tail "12CD1234567EFGH" is not digits-then-capitals.
    assert_eq!(id.period, "12CD1234567E");
    assert_eq!(id.cert_type, "FGH");
}

#[test]
fn first_of_two_preferred_runs_wins() {
    let id = parse("A11111111B22222222222C");
    assert_eq!(id.station, "A");
    assert_eq!(id.sequence, 11_111_111);
}

#[test]
fn no_preferred_run_falls_back_to_longest() {
    let id = parse("ABCDEFGH1234XYZ1234567QRSTU");
    assert_eq!(id.station, "ABCDEFGH1234XYZ");
    assert_eq!(id.sequence, 1_234_567);
    // Tail starts 10 characters after the run start, past the run itself.
    assert_eq!(id.period, "TU");
    assert_eq!(id.cert_type, "");
}

#[test]
fn longest_run_tie_keeps_leftmost() {
    let id = parse("ABCDEF1234567XYZ7654321QRSTUV");
    assert_eq!(id.station, "ABCDEF");
    assert_eq!(id.sequence, 1_234_567);
    assert_eq!(id.period, "7654321");
    assert_eq!(id.cert_type, "QRSTUV");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tail splitting
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn tail_with_punctuation_uses_fixed_width_period() {
    let id = parse("STN0000012345-0125-Solar-PV");
    assert_eq!(id.station, "STN");
    assert_eq!(id.sequence, 12_345);
    assert_eq!(id.period, "-0125-Solar-");
    assert_eq!(id.cert_type, "PV");
}

#[test]
fn short_irregular_tail_leaves_type_empty() {
    let id = parse("STATIONXYZ0000123456-Q1");
    assert_eq!(id.period, "-Q1");
    assert_eq!(id.cert_type, "");
}

#[test]
fn lowercase_type_is_not_split() {
    let id = parse("STATIONXYZ00001234560125gen");
    assert_eq!(id.period, "0125gen");
    assert_eq!(id.cert_type, "");
}

// ─────────────────────────────────────────────────────────────────────────────
// Failures
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn short_or_empty_input_is_too_short() {
    assert_eq!(
        CertificateId::parse(""),
        Err(CertIdError::TooShort { len: 0 })
    );
    assert_eq!(
        CertificateId::parse("ABC123"),
        Err(CertIdError::TooShort { len: 6 })
    );
    // 17 characters once trimmed.
    assert_eq!(
        CertificateId::parse("   G0001RPSGB1234567   "),
        Err(CertIdError::TooShort { len: 17 })
    );
}

#[test]
fn identifier_without_digits_is_rejected() {
    assert_eq!(
        CertificateId::parse("ABCDEFGHIJKLMNOPQRSTUVWXYZ"),
        Err(CertIdError::NoDigits)
    );
}
