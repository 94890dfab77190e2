use arkadien_economy::{EconomyChange, GameEconomy, STARTING_GOLD};
use proptest::prelude::*;

proptest! {
    #[test]
    fn spend_never_drives_gold_negative(earned in 0_u32..10_000, cost in 0_u32..20_000) {
        let mut economy = GameEconomy::new();
        economy.add_gold(earned);
        let before = economy.gold();

        let spent = economy.spend_gold(cost);

        if before >= cost {
            prop_assert!(spent);
            prop_assert_eq!(economy.gold(), before - cost);
        } else {
            prop_assert!(!spent);
            prop_assert_eq!(economy.gold(), before);
        }
    }

    #[test]
    fn spending_sequence_only_notifies_successful_spends(costs in prop::collection::vec(0_u32..150, 0..20)) {
        let mut economy = GameEconomy::new();
        let mut expected = Vec::new();
        let mut balance = STARTING_GOLD;
        for cost in &costs {
            if economy.spend_gold(*cost) {
                balance -= cost;
                expected.push(EconomyChange::Gold(balance));
            }
        }

        let mut changes = Vec::new();
        economy.drain_changes(&mut changes);
        prop_assert_eq!(changes, expected);
        prop_assert_eq!(economy.gold(), balance);
    }
}
