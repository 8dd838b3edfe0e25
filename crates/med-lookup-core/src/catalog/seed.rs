//! Built-in medicine dataset.

use crate::models::MedicineRecord;

/// Number of synthetic chemical formulas in the seed data.
pub const SYNTHETIC_FORMULA_COUNT: u32 = 100;

/// Records per synthetic formula, one per variant suffix.
const SYNTHETIC_VARIANTS: [(char, f64); 4] = [('A', 10.0), ('B', 15.0), ('C', 20.0), ('D', 25.0)];

/// All seed records: synthetic groups first, then real-world examples.
pub fn seed_records() -> Vec<MedicineRecord> {
    let mut records = synthetic_records();
    records.extend(real_world_records());
    records
}

/// Four records per synthetic formula `C{i}H{i}O{i}`.
fn synthetic_records() -> Vec<MedicineRecord> {
    let mut records =
        Vec::with_capacity(SYNTHETIC_FORMULA_COUNT as usize * SYNTHETIC_VARIANTS.len());

    for i in 1..=SYNTHETIC_FORMULA_COUNT {
        let formula = format!("C{i}H{i}O{i}");
        let generic_name = format!("GenericName{i}");
        let category = format!("Category{i}");

        for (suffix, base_price) in SYNTHETIC_VARIANTS {
            records.push(MedicineRecord::new(
                format!("Medicine{i}{suffix}"),
                formula.clone(),
                format!("Brand{suffix}{i}"),
                category.clone(),
                generic_name.clone(),
                base_price + f64::from(i),
            ));
        }
    }

    records
}

/// Well-known medicines grouped by formula.
fn real_world_records() -> Vec<MedicineRecord> {
    let mut records = Vec::with_capacity(16);

    // Aspirin
    records.extend(group(
        "C9H8O4",
        "Pain Reliever",
        "Acetylsalicylic Acid",
        &[
            ("Aspirin", "Bayer", 10.0),
            ("Generic Aspirin", "Generic", 8.0),
            ("Buffered Aspirin", "Bufferin", 12.0),
            ("Ecotrin", "Ecotrin", 15.0),
        ],
    ));

    // Paracetamol / acetaminophen
    records.extend(group(
        "C8H9NO2",
        "Pain Reliever",
        "Paracetamol",
        &[
            ("Acetaminophen", "Tylenol", 15.0),
            ("Paracetamol", "Generic", 10.0),
            ("Panadol", "GSK", 20.0),
            ("Calpol", "Johnson & Johnson", 18.0),
        ],
    ));

    // Ibuprofen
    records.extend(group(
        "C13H18O2",
        "NSAID",
        "Ibuprofen",
        &[
            ("Ibuprofen", "Advil", 20.0),
            ("Motrin", "Motrin", 25.0),
            ("Generic Ibuprofen", "Generic", 15.0),
            ("Nurofen", "Reckitt Benckiser", 22.0),
        ],
    ));

    // Naproxen
    records.extend(group(
        "C14H14O3",
        "NSAID",
        "Naproxen Sodium",
        &[
            ("Naproxen", "Aleve", 25.0),
            ("Naprosyn", "Roche", 30.0),
            ("Generic Naproxen", "Generic", 20.0),
            ("Anaprox", "Syntex", 28.0),
        ],
    ));

    records
}

fn group<'a>(
    formula: &'a str,
    category: &'a str,
    generic_name: &'a str,
    members: &'a [(&'a str, &'a str, f64)],
) -> impl Iterator<Item = MedicineRecord> + 'a {
    members.iter().map(move |&(name, brand, price)| {
        MedicineRecord::new(name, formula, brand, category, generic_name, price)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_size() {
        assert_eq!(seed_records().len(), 416);
    }

    #[test]
    fn test_synthetic_group_layout() {
        let records = synthetic_records();

        let first = &records[0];
        assert_eq!(first.name, "Medicine1A");
        assert_eq!(first.chemical_formula, "C1H1O1");
        assert_eq!(first.brand, "BrandA1");
        assert_eq!(first.category, "Category1");
        assert_eq!(first.generic_name, "GenericName1");
        assert_eq!(first.price, 11.0);

        let last = records.last().unwrap();
        assert_eq!(last.name, "Medicine100D");
        assert_eq!(last.chemical_formula, "C100H100O100");
        assert_eq!(last.price, 125.0);
    }

    #[test]
    fn test_real_world_groups_follow_synthetic() {
        let records = seed_records();
        let aspirin = &records[400];

        assert_eq!(aspirin.name, "Aspirin");
        assert_eq!(aspirin.brand, "Bayer");
        assert_eq!(records[415].name, "Anaprox");
    }

    #[test]
    fn test_every_formula_has_four_records() {
        let records = seed_records();
        for formula in ["C9H8O4", "C8H9NO2", "C13H18O2", "C14H14O3", "C42H42O42"] {
            let count = records
                .iter()
                .filter(|r| r.chemical_formula == formula)
                .count();
            assert_eq!(count, 4, "formula {}", formula);
        }
    }
}
