//! Integration tests for the shared node cell.

use errscribe_internals::SharedCell;

struct Node {
    label: &'static str,
    next: Option<SharedCell<Node>>,
}

#[test]
fn test_write_then_read() {
    let cell = SharedCell::new(Node {
        label: "a",
        next: None,
    });
    cell.write().label = "b";
    assert_eq!(cell.read().label, "b");
}

#[test]
fn test_cycle_through_clones() {
    let a = SharedCell::new(Node {
        label: "a",
        next: None,
    });
    let b = SharedCell::new(Node {
        label: "b",
        next: Some(a.clone()),
    });
    a.write().next = Some(b.clone());

    // Walk the loop twice while holding every guard on the path.
    let g0 = a.read();
    let n1 = g0.next.clone().expect("a links to b");
    let g1 = n1.read();
    let n2 = g1.next.clone().expect("b links back to a");
    let g2 = n2.read();
    assert_eq!(g1.label, "b");
    assert_eq!(g2.label, "a");
    assert_eq!(n2.identity(), a.identity());
    drop((g2, g1, g0));

    // Break the cycle so both nodes are released.
    a.write().next = None;
}

#[test]
fn test_identity_is_stable_across_mutation() {
    let cell = SharedCell::new(Node {
        label: "x",
        next: None,
    });
    let before = cell.identity();
    cell.write().label = "y";
    assert_eq!(before, cell.identity());
    assert_eq!(before.addr(), cell.clone().identity().addr());
}

#[test]
fn test_identity_debug() {
    let cell = SharedCell::new(Node {
        label: "x",
        next: None,
    });
    let text = format!("{:?}", cell);
    assert!(text.starts_with("SharedCell(Identity(0x"));
    assert_eq!(cell.read().label, "x");
}
