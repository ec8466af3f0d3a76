//! Cart ledger behaviour against the bundled LumiStyle catalog.

use lumistyle_core::{CartLedger, Catalog, LineKey, format_amount};
use lumistyle_storefront::catalog::bundled_catalog;

fn catalog() -> Catalog {
    bundled_catalog().expect("bundled catalog")
}

#[test]
fn test_same_variant_merges_and_other_variant_appends() {
    let catalog = catalog();
    let tee = catalog.find_by_id("p1").expect("p1");
    let mut cart = CartLedger::new();

    cart.add(tee, Some("M"), None);
    cart.add(tee, Some("M"), None);
    let lines = cart.add(tee, Some("L"), None);

    let [medium, large] = lines else {
        panic!("expected two lines, got {}", lines.len());
    };
    assert_eq!(medium.selected_size.as_deref(), Some("M"));
    assert_eq!(medium.selected_color.as_deref(), Some("White"));
    assert_eq!(medium.quantity, 2);
    assert_eq!(large.selected_size.as_deref(), Some("L"));
    assert_eq!(large.quantity, 1);
    assert_eq!(cart.item_count(), 3);
    assert_eq!(format_amount(cart.total()), "$89.97");
}

#[test]
fn test_default_variant_matches_explicit_default() {
    let catalog = catalog();
    let watch = catalog.find_by_id("p8").expect("p8");
    let mut cart = CartLedger::new();

    cart.add(watch, None, None);
    cart.add(watch, Some("One Size"), Some("Silver"));

    assert_eq!(cart.lines().len(), 1);
    assert_eq!(cart.lines().first().expect("line").quantity, 2);
    assert_eq!(format_amount(cart.total()), "$500.00");
}

#[test]
fn test_coarse_and_line_precise_operations() {
    let catalog = catalog();
    let tee = catalog.find_by_id("p1").expect("p1");
    let jeans = catalog.find_by_id("p2").expect("p2");
    let mut cart = CartLedger::new();

    cart.add(tee, Some("M"), Some("Black"));
    cart.add(tee, Some("L"), Some("Black"));
    cart.add(jeans, Some("32"), None);

    // Coarse update touches every p1 line.
    assert_eq!(cart.update_quantity("p1", 3), 2);
    assert!(cart.lines().iter().filter(|l| l.product.id == "p1").all(|l| l.quantity == 3));

    // Precise update touches only the keyed line, clamped to 1.
    let key = LineKey::resolve(tee, Some("L"), Some("Black"));
    assert!(cart.set_line_quantity(&key, -4));
    assert_eq!(cart.lines().get(1).expect("second line").quantity, 1);

    assert!(cart.remove_line(&key));
    assert_eq!(cart.lines().len(), 2);

    assert_eq!(cart.remove("p1"), 1);
    assert_eq!(cart.remove("p404"), 0);

    let snapshot = cart.snapshot();
    assert_eq!(snapshot.items.len(), 1);
    assert_eq!(snapshot.item_count, 1);
    assert_eq!(format_amount(snapshot.total), "$89.99");
}

#[test]
fn test_unoffered_variant_falls_back_to_first_offered() {
    let catalog = catalog();
    let sneakers = catalog.find_by_id("p4").expect("p4");
    let mut cart = CartLedger::new();

    cart.add(sneakers, Some("XXL"), Some("  "));

    let line = cart.lines().first().expect("line");
    assert_eq!(line.selected_size.as_deref(), Some("8"));
    assert_eq!(line.selected_color.as_deref(), Some("White"));
}
