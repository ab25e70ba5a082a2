use battleship_server::{
    generate_fleet, generate_fleet_with, Board, Coordinate, PlacementConfig, PlacementError,
    ShipType, CELL_COUNT, COLS, NUM_SHIPS, ROWS, TOTAL_SHIP_CELLS,
};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_fleet(seed: u64) -> Board {
    let mut rng = SmallRng::seed_from_u64(seed);
    generate_fleet(&mut rng).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn fleet_layout_is_valid(seed in any::<u64>()) {
        let board = random_fleet(seed);
        prop_assert_eq!(board.ships().len(), NUM_SHIPS);
        prop_assert_eq!(board.occupied().count_ones(), TOTAL_SHIP_CELLS);

        let cell_total: usize = board.ships().iter().map(|s| s.cells().count()).sum();
        prop_assert_eq!(cell_total, TOTAL_SHIP_CELLS);

        for ship in board.ships() {
            for cell in ship.cells() {
                prop_assert!(cell.in_bounds());
            }
        }
        let mut sizes: Vec<u8> = board.ships().iter().map(|s| s.size()).collect();
        sizes.sort_unstable();
        prop_assert_eq!(sizes, vec![2, 3, 3, 4, 5]);
        prop_assert!(board.hits().is_empty());
        prop_assert!(board.misses().is_empty());
    }

    #[test]
    fn repeated_shot_is_idempotent(seed in any::<u64>(), x in 0..COLS as i32, y in 0..ROWS as i32) {
        let mut board = random_fleet(seed);
        let before = board.clone();
        let coord = Coordinate::new(x, y);

        board.apply_shot(coord).unwrap();
        let after = board.clone();
        prop_assert!(board.apply_shot(coord).is_err());
        prop_assert_eq!(&board, &after);
        prop_assert_ne!(&before, &after);
    }

    #[test]
    fn hits_stay_on_ships(seed in any::<u64>()) {
        let mut board = random_fleet(seed);
        let mut rng = SmallRng::seed_from_u64(seed ^ 0x5eed);
        for _ in 0..rng.random_range(0..CELL_COUNT) {
            let coord = Coordinate::new(
                rng.random_range(0..COLS as i32),
                rng.random_range(0..ROWS as i32),
            );
            let _ = board.apply_shot(coord);
        }
        prop_assert!(board.hits().is_subset_of(&board.occupied()));
        prop_assert!((board.misses() & board.occupied()).is_empty());
        prop_assert!((board.hits() & board.misses()).is_empty());
    }
}

#[test]
fn test_infeasible_roster_is_fatal() {
    let mut rng = SmallRng::seed_from_u64(7);
    let roster = [ShipType::new("Carrier", 5); 25];
    let config = PlacementConfig {
        attempts_per_ship: 50,
        restarts: 3,
    };
    let err = generate_fleet_with(&mut rng, &roster, config).unwrap_err();
    assert_eq!(err, PlacementError::Exhausted { restarts: 3 });
}

#[test]
fn test_same_seed_same_fleet() {
    assert_eq!(random_fleet(42), random_fleet(42));
}

#[test]
fn test_default_config() {
    let config = PlacementConfig::default();
    assert!(config.attempts_per_ship > 0);
    assert!(config.restarts > 0);
}
