//! Property-based tests for sprite numbering and remap planning.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p tiledup-tests --test proptest_remap
//! ```

use proptest::prelude::*;

use tiledup_asset::remap::rewrite_references;
use tiledup_asset::{increment_name, sequence_number, RemapPlan, Sprite, SpriteIndex};
use tiledup_tests::sprite_file_id;

const GUID: &str = "0123456789abcdef0123456789abcdef";

// ============================================================================
// 1. Sequence Numbers
// ============================================================================

proptest! {
    /// The sequence number is the first run of digits in the name.
    #[test]
    fn sequence_number_is_first_digit_run(
        prefix in "[A-Za-z_]{0,8}",
        digits in "[0-9]{1,9}",
        suffix in "([A-Za-z_.]{1,6}[0-9]{0,3})?",
    ) {
        let name = format!("{}{}{}", prefix, digits, suffix);
        let expected: i64 = digits.parse().unwrap();
        prop_assert_eq!(sequence_number(&name).unwrap(), expected);
    }

    /// Names without digits never yield a sequence number.
    #[test]
    fn names_without_digits_fail(name in "[A-Za-z_.]{0,16}") {
        prop_assert!(sequence_number(&name).is_err());
    }

    /// Incrementing rewrites the first digit run as the next plain decimal.
    #[test]
    fn increment_adds_one_to_first_run(
        prefix in "[A-Za-z_]{1,8}",
        digits in "[0-9]{1,9}",
        suffix in "[A-Za-z_]{0,6}",
    ) {
        let name = format!("{}{}{}", prefix, digits, suffix);
        let next: i64 = digits.parse::<i64>().unwrap() + 1;
        prop_assert_eq!(increment_name(&name), format!("{}{}{}", prefix, next, suffix));
    }
}

// ============================================================================
// 2. Remap Planning
// ============================================================================

/// A contiguous sheet and a non-empty selection of its positions in arbitrary order.
fn sheet_and_order() -> impl Strategy<Value = (i64, usize, Vec<usize>)> {
    (0i64..1000, 1usize..30).prop_flat_map(|(start, len)| {
        let positions: Vec<usize> = (0..len).collect();
        (
            Just(start),
            Just(len),
            prop::sample::subsequence(positions, 1..=len).prop_shuffle(),
        )
    })
}

fn sheet_sprites(start: i64, len: usize) -> Vec<Sprite> {
    (start..start + len as i64)
        .map(|n| {
            Sprite::new(
                format!("Grass_{}.asset", n),
                sprite_file_id(n),
                Some(GUID.to_string()),
            )
            .unwrap()
        })
        .collect()
}

fn tile_text(order: &[Sprite]) -> String {
    let mut text = String::from("MonoBehaviour:\n  m_Name: Grass_1\n  m_TilingRules:\n");
    for sprite in order {
        text.push_str(&format!(
            "  - m_Sprites:\n    - {{fileID: {}, guid: {}, type: 3}}\n",
            sprite.reference_id, GUID
        ));
    }
    text
}

proptest! {
    /// Starting the target at the first original sprite maps every sprite onto itself.
    #[test]
    fn target_at_first_sprite_is_identity((start, len, order) in sheet_and_order()) {
        let sprites = sheet_sprites(start, len);
        let originals: Vec<Sprite> = order.iter().map(|&i| sprites[i].clone()).collect();
        let index = SpriteIndex::from_sprites(sprites);

        let plan = RemapPlan::build(&originals, &index, originals[0].sequence_number).unwrap();
        prop_assert_eq!(plan.shift, 0);
        let destinations: Vec<Sprite> = plan.destinations().cloned().collect();
        prop_assert_eq!(&destinations, &originals);

        let text = tile_text(&originals);
        let (rewritten, _) = rewrite_references(&text, &plan, false);
        prop_assert_eq!(rewritten, text);
    }

    /// Every shifted sprite lands exactly `shift` positions away, or is unresolved
    /// when that falls off the sheet.
    #[test]
    fn shifted_sprites_keep_their_distance(
        (start, len, order) in sheet_and_order(),
        offset in -40i64..40,
    ) {
        let sprites = sheet_sprites(start, len);
        let originals: Vec<Sprite> = order.iter().map(|&i| sprites[i].clone()).collect();
        let index = SpriteIndex::from_sprites(sprites);

        let target = originals[0].sequence_number + offset;
        let plan = RemapPlan::build(&originals, &index, target).unwrap();
        prop_assert_eq!(plan.shift, offset);
        for entry in &plan.entries {
            let wanted = entry.original.sequence_number + offset;
            let on_sheet = (start..start + len as i64).contains(&wanted);
            match entry.resolution.sprite() {
                Some(found) => {
                    prop_assert_eq!(found.sequence_number, wanted);
                }
                None => {
                    prop_assert!(!on_sheet);
                }
            }
        }
    }
}
