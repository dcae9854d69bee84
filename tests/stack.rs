use proptest::prelude::*;
use rbtree_arena::Stack;
use rbtree_arena::stack;

/// The number of operations to perform in each proptest case.
const TEST_SIZE: usize = 10_000;

fn value_strategy() -> impl Strategy<Value = i64> {
    any::<i64>()
}

// ─── Operations enum for driving randomized tests ────────────────────────────

#[derive(Debug, Clone)]
enum StackOp {
    Push(i64),
    Pop,
    Peek,
}

fn stack_op_strategy() -> impl Strategy<Value = StackOp> {
    prop_oneof![
        5 => value_strategy().prop_map(StackOp::Push),
        3 => Just(StackOp::Pop),
        2 => Just(StackOp::Peek),
    ]
}

// ─── LIFO discipline ─────────────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Replays a random sequence of push/pop/peek operations on both Stack
    /// and Vec and asserts identical results at every step.
    #[test]
    fn stack_ops_match_vec(ops in proptest::collection::vec(stack_op_strategy(), TEST_SIZE)) {
        let mut stack: Stack<i64> = Stack::new();
        let mut model: Vec<i64> = Vec::new();

        for op in &ops {
            match op {
                StackOp::Push(v) => {
                    stack.push(*v);
                    model.push(*v);
                }
                StackOp::Pop => {
                    let st_result = stack.pop();
                    let vec_result = model.pop();
                    prop_assert_eq!(st_result, vec_result, "pop() mismatch");
                }
                StackOp::Peek => {
                    let st_result = stack.peek();
                    let vec_result = model.last();
                    prop_assert_eq!(st_result, vec_result, "peek() mismatch");
                }
            }
            prop_assert_eq!(stack.len(), model.len(), "len mismatch after {:?}", op);
            prop_assert_eq!(stack.is_empty(), model.is_empty(), "is_empty mismatch after {:?}", op);
        }
    }

    /// Tests that popping returns values in reverse push order.
    #[test]
    fn pop_reverses_push_order(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let mut stack: Stack<i64> = Stack::new();
        for &v in &values {
            stack.push(v);
        }

        let mut popped = Vec::with_capacity(values.len());
        while let Some(v) = stack.pop() {
            popped.push(v);
        }

        let mut expected = values.clone();
        expected.reverse();
        prop_assert_eq!(&popped, &expected, "pop order mismatch");
        prop_assert!(stack.is_empty());
        prop_assert_eq!(stack.pop(), None, "pop on empty stack");
    }

    /// Tests iteration runs bottom-to-top in push order.
    #[test]
    fn iter_matches_push_order(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        let stack: Stack<i64> = values.iter().copied().collect();

        // Forward iteration (bottom to top)
        let st_items: Vec<_> = stack.iter().copied().collect();
        prop_assert_eq!(&st_items, &values, "iter() mismatch");

        // Reverse iteration (top to bottom, pop order)
        let st_rev: Vec<_> = stack.iter().rev().copied().collect();
        let mut expected_rev = values.clone();
        expected_rev.reverse();
        prop_assert_eq!(&st_rev, &expected_rev, "iter().rev() mismatch");

        // into_iter consumes bottom to top
        let st_into: Vec<_> = stack.clone().into_iter().collect();
        prop_assert_eq!(&st_into, &values, "into_iter() mismatch");
    }

    /// Tests iter_mut mutation is visible through pops.
    #[test]
    fn iter_mut_matches(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let mut stack: Stack<i64> = values.iter().copied().collect();
        let mut model = values.clone();

        for v in stack.iter_mut() {
            *v = v.wrapping_add(1);
        }
        for v in model.iter_mut() {
            *v = v.wrapping_add(1);
        }

        prop_assert_eq!(stack.pop(), model.pop(), "pop after iter_mut mismatch");
        let st_items: Vec<_> = stack.iter().copied().collect();
        prop_assert_eq!(&st_items, &model, "iter_mut content mismatch");
    }

    /// Tests comparisons agree with Vec, element-wise from the bottom up.
    #[test]
    fn ord_matches_vec(
        values_a in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        values_b in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let st_a: Stack<i64> = values_a.iter().copied().collect();
        let st_b: Stack<i64> = values_b.iter().copied().collect();

        prop_assert_eq!(st_a == st_b, values_a == values_b, "equality mismatch");
        prop_assert_eq!(st_a.cmp(&st_b), values_a.cmp(&values_b), "Ord mismatch");
        prop_assert_eq!(
            st_a.partial_cmp(&st_b),
            values_a.partial_cmp(&values_b),
            "PartialOrd mismatch"
        );
    }

    /// Tests Hash consistency for equal stacks.
    #[test]
    fn hash_consistent_for_equal_stacks(values in proptest::collection::vec(value_strategy(), TEST_SIZE)) {
        use std::hash::{DefaultHasher, Hash, Hasher};

        let st1: Stack<i64> = values.iter().copied().collect();
        let st2 = Stack::from(values.clone());
        prop_assert_eq!(&st1, &st2, "stacks with the same content should be equal");

        let mut h1 = DefaultHasher::new();
        let mut h2 = DefaultHasher::new();
        st1.hash(&mut h1);
        st2.hash(&mut h2);

        prop_assert_eq!(h1.finish(), h2.finish(), "equal stacks should have equal hashes");
    }

    /// Tests Clone produces an independent stack.
    #[test]
    fn clone_is_independent(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let original: Stack<i64> = values.iter().copied().collect();
        let mut copy = original.clone();

        prop_assert_eq!(&original, &copy);

        copy.pop();
        prop_assert_eq!(original.len(), values.len(), "original shrank with the copy");
        prop_assert_eq!(copy.len(), values.len() - 1);
    }

    /// Tests Extend pushes in iteration order.
    #[test]
    fn extend_matches_vec(
        initial in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
        extra in proptest::collection::vec(value_strategy(), TEST_SIZE / 2),
    ) {
        let mut stack: Stack<i64> = initial.iter().copied().collect();
        let mut model = initial.clone();

        stack.extend(extra.iter().copied());
        model.extend(extra.iter().copied());

        let st_items: Vec<_> = stack.iter().copied().collect();
        prop_assert_eq!(&st_items, &model, "extend mismatch");
        prop_assert_eq!(stack.peek(), model.last(), "peek after extend mismatch");
    }

    /// Tests From<Vec<T>> keeps the vector's order with the last element on top.
    #[test]
    fn from_vec_matches(values in proptest::collection::vec(value_strategy(), 1..TEST_SIZE)) {
        let mut stack = Stack::from(values.clone());

        prop_assert_eq!(stack.len(), values.len());
        prop_assert_eq!(stack.peek(), values.last(), "top should be the vector's last element");
        let popped = stack.pop();
        prop_assert_eq!(popped.as_ref(), values.last());
    }
}

// ─── Deterministic behavior tests ─────────────────────────────────────────────

#[test]
fn peek_mut_changes_only_the_top() {
    let mut stack = Stack::new();
    stack.push(1);
    stack.push(2);

    if let Some(top) = stack.peek_mut() {
        *top = 20;
    }

    assert_eq!(stack.pop(), Some(20));
    assert_eq!(stack.pop(), Some(1));
    assert!(stack.peek_mut().is_none());
}

#[test]
fn clear_empties_stack() {
    let mut stack: Stack<i32> = (0..100).collect();
    assert_eq!(stack.len(), 100);

    stack.clear();

    assert!(stack.is_empty());
    assert_eq!(stack.peek(), None);
    assert_eq!(stack.pop(), None);
}

#[test]
fn with_capacity_and_default() {
    let stack: Stack<i32> = Stack::with_capacity(64);
    assert!(stack.is_empty());
    assert!(stack.capacity() >= 64);

    let default_stack: Stack<i32> = Default::default();
    assert!(default_stack.is_empty());
    let _ = format!("{:?}", default_stack);
}

#[test]
fn debug_lists_bottom_to_top() {
    let mut stack = Stack::new();
    stack.push(1);
    stack.push(2);
    stack.push(3);

    assert_eq!(format!("{:?}", stack), "[1, 2, 3]");
}

#[test]
fn comparisons_run_bottom_to_top() {
    let shorter: Stack<i32> = [1, 2].into_iter().collect();
    let longer: Stack<i32> = [1, 2, 3].into_iter().collect();
    let greater_bottom: Stack<i32> = [2].into_iter().collect();

    // A prefix sorts before its extension, and the bottom element
    // dominates everything above it.
    assert!(shorter < longer);
    assert!(longer < greater_bottom);
    assert_ne!(shorter, longer);

    let equal: Stack<i32> = [1, 2].into_iter().collect();
    assert_eq!(shorter, equal);
}

#[test]
#[allow(clippy::double_ended_iterator_last)]
fn iterator_trait_impls() {
    let mut stack: Stack<i32> = [1, 2, 3].into_iter().collect();

    {
        let iter = stack.iter();
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert_eq!(iter.clone().last(), Some(&3));
        let _ = format!("{:?}", iter.clone());
    }

    {
        let mut iter_mut = stack.iter_mut();
        assert_eq!(iter_mut.len(), 3);
        let back = iter_mut.next_back().map(|v| *v);
        assert_eq!(back, Some(3));
        let _ = format!("{:?}", iter_mut);
    }

    {
        let mut into_iter = stack.clone().into_iter();
        assert_eq!(into_iter.len(), 3);
        assert_eq!(into_iter.next(), Some(1));
        assert_eq!(into_iter.next_back(), Some(3));
        let _ = format!("{:?}", into_iter);
    }

    // Borrowing IntoIterator forms
    let by_ref: Vec<_> = (&stack).into_iter().copied().collect();
    assert_eq!(by_ref, vec![1, 2, 3]);
    for v in &mut stack {
        *v += 10;
    }
    assert_eq!(stack.peek(), Some(&13));

    let empty_iter: stack::Iter<'_, i32> = Default::default();
    assert_eq!(empty_iter.len(), 0);
    let _ = format!("{:?}", empty_iter.clone());

    let empty_iter_mut: stack::IterMut<'_, i32> = Default::default();
    assert_eq!(empty_iter_mut.len(), 0);
    let _ = format!("{:?}", empty_iter_mut);

    let empty_into_iter: stack::IntoIter<i32> = Default::default();
    assert_eq!(empty_into_iter.len(), 0);
    let _ = format!("{:?}", empty_into_iter);
}

// ─── Drop Semantics Tests ─────────────────────────────────────────────────────

mod drop_tests {
    use rbtree_arena::Stack;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Droppable {
        drop_count: Rc<Cell<i32>>,
    }

    impl Droppable {
        fn new(drop_count: Rc<Cell<i32>>) -> Self {
            Self {
                drop_count,
            }
        }
    }

    impl Drop for Droppable {
        fn drop(&mut self) {
            self.drop_count.set(self.drop_count.get() + 1);
        }
    }

    #[test]
    fn values_dropped_on_clear() {
        let drop_count = Rc::new(Cell::new(0));
        let mut stack: Stack<Droppable> = Stack::new();

        for _ in 0..100 {
            stack.push(Droppable::new(drop_count.clone()));
        }
        assert_eq!(drop_count.get(), 0, "no drops before clear");

        stack.clear();
        assert_eq!(drop_count.get(), 100, "all values dropped after clear");
        assert!(stack.is_empty());
    }

    #[test]
    fn values_dropped_on_stack_drop() {
        let drop_count = Rc::new(Cell::new(0));
        {
            let mut stack: Stack<Droppable> = Stack::new();
            for _ in 0..100 {
                stack.push(Droppable::new(drop_count.clone()));
            }
            assert_eq!(drop_count.get(), 0, "no drops before stack drop");
        }
        assert_eq!(drop_count.get(), 100, "all values dropped when stack dropped");
    }

    #[test]
    fn popped_value_dropped_by_caller() {
        let drop_count = Rc::new(Cell::new(0));
        let mut stack: Stack<Droppable> = Stack::new();

        stack.push(Droppable::new(drop_count.clone()));
        stack.push(Droppable::new(drop_count.clone()));

        let popped = stack.pop();
        assert!(popped.is_some());
        assert_eq!(drop_count.get(), 0, "popped value is alive until dropped");

        drop(popped);
        assert_eq!(drop_count.get(), 1, "popped value dropped by caller");
        assert_eq!(stack.len(), 1);
    }
}
