use battleship_server::{
    ship_type_by_name, Board, CellMask, Coordinate, Orientation, PlacementError, Ship,
    ShipPlacement, ShipType, SHIPS,
};

#[test]
fn test_new_and_cells() -> Result<(), PlacementError> {
    let def = ShipType::new("Test", 3);
    let ship = Ship::new(def, Coordinate::new(1, 2), Orientation::Horizontal)?;
    let cells: Vec<_> = ship.cells().collect();
    assert_eq!(
        cells,
        vec![Coordinate::new(1, 2), Coordinate::new(2, 2), Coordinate::new(3, 2)]
    );
    assert_eq!(ship.size(), 3);
    assert_eq!(ship.mask().count_ones(), 3);
    assert!(ship.is_horizontal());
    Ok(())
}

#[test]
fn test_vertical_contains() -> Result<(), PlacementError> {
    let ship = Ship::new(SHIPS[1], Coordinate::new(0, 0), Orientation::Vertical)?;
    for y in 0..4 {
        assert!(ship.contains(Coordinate::new(0, y)));
    }
    assert!(!ship.contains(Coordinate::new(0, 4)));
    assert!(!ship.contains(Coordinate::new(1, 0)));
    assert!(!ship.contains(Coordinate::new(-1, 0)));
    Ok(())
}

#[test]
fn test_tail_off_board_is_rejected() {
    let anchor = Coordinate::new(7, 0);
    let err = Ship::new(SHIPS[0], anchor, Orientation::Horizontal).unwrap_err();
    assert_eq!(err, PlacementError::OutOfBounds { anchor });

    let anchor = Coordinate::new(0, 9);
    let err = Ship::new(SHIPS[4], anchor, Orientation::Vertical).unwrap_err();
    assert_eq!(err, PlacementError::OutOfBounds { anchor });

    // a ship ending exactly on the edge fits
    assert!(Ship::new(SHIPS[0], Coordinate::new(5, 9), Orientation::Horizontal).is_ok());
}

#[test]
fn test_extreme_anchors_are_out_of_bounds() {
    for anchor in [
        Coordinate::new(i32::MAX, 0),
        Coordinate::new(0, i32::MAX),
        Coordinate::new(i32::MAX - 2, i32::MAX - 2),
        Coordinate::new(i32::MIN, 0),
    ] {
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let err = Ship::new(SHIPS[0], anchor, orientation).unwrap_err();
            assert_eq!(err, PlacementError::OutOfBounds { anchor });
        }
    }

    let mut board = Board::new();
    let anchor = Coordinate::new(i32::MAX, 3);
    assert_eq!(
        board.place_at(SHIPS[0], anchor, Orientation::Horizontal),
        Err(PlacementError::OutOfBounds { anchor })
    );
    assert_eq!(board.ships().len(), 0);
}

#[test]
fn test_placement_cells_saturate() {
    let placement = ShipPlacement {
        x: i32::MAX - 1,
        y: 0,
        size: 5,
        horizontal: true,
    };
    let cells: Vec<_> = placement.cells().collect();
    assert_eq!(cells.len(), 5);
    assert!(cells.iter().all(|c| !c.in_bounds()));
    assert_eq!(cells[4], Coordinate::new(i32::MAX, 0));
}

#[test]
fn test_invalid_sizes() {
    for len in [0u8, 6] {
        let err = Ship::new(ShipType::new("Odd", len), Coordinate::new(0, 0), Orientation::Vertical)
            .unwrap_err();
        assert_eq!(err, PlacementError::InvalidSize(len));
    }
}

#[test]
fn test_is_sunk() -> Result<(), Box<dyn std::error::Error>> {
    let ship = Ship::new(SHIPS[4], Coordinate::new(4, 4), Orientation::Vertical)?;
    let mut hits = CellMask::new();
    hits.insert(Coordinate::new(4, 4))?;
    assert!(!ship.is_sunk(&hits));
    hits.insert(Coordinate::new(4, 5))?;
    assert!(ship.is_sunk(&hits));
    Ok(())
}

#[test]
fn test_roster_lookup() {
    assert_eq!(ship_type_by_name("Cruiser"), Some(SHIPS[2]));
    assert_eq!(ship_type_by_name("Rowboat"), None);
    let total: usize = SHIPS.iter().map(|s| s.length() as usize).sum();
    assert_eq!(total, 17);
    assert_eq!(Orientation::from_horizontal(false), Orientation::Vertical);
}
