use proptest::prelude::*;
use rarray::DynamicArray;

#[derive(Debug, Clone)]
enum Op {
  Push(i32),
  Insert(usize, i32),
  Remove(usize),
  Pop,
  Clear,
  Reserve(usize),
  Shrink,
}

fn op() -> impl Strategy<Value = Op> {
  prop_oneof![
    4 => any::<i32>().prop_map(Op::Push),
    2 => (0usize..64, any::<i32>()).prop_map(|(i, v)| Op::Insert(i, v)),
    2 => (0usize..64).prop_map(Op::Remove),
    1 => Just(Op::Pop),
    1 => Just(Op::Clear),
    1 => (0usize..128).prop_map(Op::Reserve),
    1 => Just(Op::Shrink),
  ]
}

proptest! {
  #[test]
  fn len_never_exceeds_capacity_and_matches_model(ops in proptest::collection::vec(op(), 0..200)) {
    let mut array = DynamicArray::new();
    let mut model: Vec<i32> = Vec::new();

    for op in ops {
      match op {
        Op::Push(v) => {
          array.push_back(v);
          model.push(v);
        }
        Op::Insert(i, v) => {
          let i = i % (model.len() + 1);
          array.insert_at(i, v);
          model.insert(i, v);
        }
        Op::Remove(i) => {
          let i = i % (model.len() + 1);
          let expected = if model.is_empty() {
            None
          } else if i == model.len() {
            model.pop()
          } else {
            Some(model.remove(i))
          };
          prop_assert_eq!(array.remove_at(i), expected);
        }
        Op::Pop => prop_assert_eq!(array.pop_back(), model.pop()),
        Op::Clear => {
          array.clear();
          model.clear();
        }
        Op::Reserve(n) => {
          let before = array.capacity();
          array.reserve(n);
          prop_assert_eq!(array.capacity(), before.max(n));
        }
        Op::Shrink => {
          array.shrink_to_fit();
          prop_assert_eq!(array.capacity(), model.len());
        }
      }

      prop_assert!(array.len() <= array.capacity());
      prop_assert_eq!(array.as_slice(), model.as_slice());
    }
  }

  #[test]
  fn appended_values_read_back_in_order(values in proptest::collection::vec(any::<u64>(), 0..300)) {
    let mut array = DynamicArray::new();
    for &v in &values {
      array.push_back(v);
    }

    prop_assert_eq!(array.len(), values.len());
    for (i, v) in values.iter().enumerate() {
      prop_assert_eq!(&array[i], v);
    }

    let walked: Vec<u64> = array.begin().to(array.end()).copied().collect();
    prop_assert_eq!(walked, values);
  }

  #[test]
  fn copy_is_independent(values in proptest::collection::vec(any::<String>(), 1..40)) {
    let original = DynamicArray::from_values(values.clone());
    let mut copy = original.clone();

    copy.pop_back();
    copy.insert_at(0, String::from("changed"));

    prop_assert_eq!(original.len(), values.len());
    prop_assert_eq!(original.as_slice(), values.as_slice());
  }

  #[test]
  fn take_empties_source(values in proptest::collection::vec(any::<i16>(), 0..40), extra in any::<i16>()) {
    let mut source = DynamicArray::from_values(values.clone());
    let moved = source.take();

    prop_assert_eq!(source.len(), 0);
    prop_assert_eq!(source.capacity(), 0);
    prop_assert_eq!(moved.as_slice(), values.as_slice());

    source.push_back(extra);
    prop_assert_eq!(source.as_slice(), &[extra][..]);
  }

  #[test]
  fn insert_then_remove_is_identity(
    values in proptest::collection::vec(any::<i32>(), 0..40),
    index in any::<prop::sample::Index>(),
    inserted in any::<i32>(),
  ) {
    let i = index.index(values.len() + 1);
    let mut array = DynamicArray::from_values(values.clone());

    array.insert_at(i, inserted);
    prop_assert_eq!(array[i], inserted);
    prop_assert_eq!(array.remove_at(i), Some(inserted));
    prop_assert_eq!(array.as_slice(), values.as_slice());
  }

  #[test]
  fn remove_closes_the_gap(
    values in proptest::collection::vec(any::<i32>(), 1..40),
    index in any::<prop::sample::Index>(),
  ) {
    let i = index.index(values.len());
    let mut array = DynamicArray::from_values(values.clone());

    let removed = array.remove_at(i);

    let mut expected = values.clone();
    prop_assert_eq!(removed, Some(expected.remove(i)));
    prop_assert_eq!(array.as_slice(), expected.as_slice());
  }

  #[test]
  fn absent_value_is_not_found(values in proptest::collection::vec(0i32..100, 0..40), needle in 100i32..200) {
    let array = DynamicArray::from_values(values);

    prop_assert!(!array.contains(&needle));
    prop_assert_eq!(array.index_of(&needle), None);
  }
}
