//! Property-based round trips: encode random payloads, render, decode

mod common;

use common::{Modules, payloads, render};
use proptest::prelude::*;
use qr_reader::{Decoder, ECLevel};

fn ec_level() -> impl Strategy<Value = ECLevel> {
    prop_oneof![
        Just(ECLevel::L),
        Just(ECLevel::M),
        Just(ECLevel::Q),
        Just(ECLevel::H),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Arbitrary ASCII-range bytes survive the whole pipeline
    #[test]
    fn prop_roundtrip_bytes(
        data in prop::collection::vec(0u8..128, 1..60),
        level in ec_level(),
        scale in 3usize..6,
    ) {
        let modules = Modules::encode(&data, level);
        let results = Decoder::default().decode(&render(&modules, scale));
        prop_assert_eq!(payloads(&results), vec![data]);
    }

    /// Text and digits, which the encoder splits into mixed segments
    #[test]
    fn prop_roundtrip_text(data in "[A-Z0-9 $%*+./:-]{1,40}[a-z]{0,10}[0-9]{0,20}") {
        let modules = Modules::encode(data.as_bytes(), ECLevel::M);
        let results = Decoder::default().decode(&render(&modules, 4));
        let symbol = results.iter().flatten().next();
        prop_assert!(symbol.is_some(), "no symbol decoded: {:?}", results);
        prop_assert_eq!(symbol.map(|s| s.payload.as_slice()), Some(data.as_bytes()));
    }
}
