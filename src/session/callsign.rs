use rand::Rng;

/// Display names handed to the two players of a match.
pub const PIRATE_NAMES: [&str; 20] = [
    "Calico Kraken",
    "Scarlet Storm",
    "Ironhook Inez",
    "Black Coral Jack",
    "Captain Sable",
    "Rogue Tidemaster",
    "Azure Buccaneer",
    "Barnacle Briggs",
    "Marrowbeard Mae",
    "Sirena Cutlass",
    "Grimwave Gideon",
    "Harpoon Harlow",
    "Corsair Crowe",
    "Tempest Thorne",
    "Riptide Reyes",
    "Moonlit Marauder",
    "Volt Voyager",
    "Ghostwake Grey",
    "Tidal Tamsin",
    "Widow Wraith",
];

const REDRAWS: usize = 10;

/// Two distinct call signs drawn from `names`.
///
/// The second name is redrawn up to ten times; if it still collides it gets
/// a `" II"` suffix.
pub fn call_signs<R: Rng + ?Sized>(rng: &mut R, names: &[&str]) -> [String; 2] {
    if names.is_empty() {
        return ["Unknown Corsair".to_string(), "Unknown Corsair II".to_string()];
    }
    let first = names[rng.random_range(0..names.len())];
    let mut second = first;
    let mut attempts = 0;
    while second == first && attempts < REDRAWS {
        second = names[rng.random_range(0..names.len())];
        attempts += 1;
    }

    let second = if second == first {
        format!("{} II", first)
    } else {
        second.to_string()
    };
    [first.to_string(), second]
}

