use std::fmt;

use rarray::{DynamicArray, log, log_error, log_info};

/// A point that owns a small heap buffer, so every copy and every drop is
/// observable.
struct Point {
  x: i32,
  y: i32,
  memory_block: Box<[i32; 5]>,
}

impl Point {
  fn new(
    x: i32,
    y: i32,
  ) -> Self {
    Self {
      x,
      y,
      memory_block: Box::new([0; 5]),
    }
  }
}

impl Clone for Point {
  fn clone(&self) -> Self {
    log_info!("Point copy");
    Self {
      x: self.x,
      y: self.y,
      memory_block: self.memory_block.clone(),
    }
  }
}

impl Drop for Point {
  fn drop(&mut self) {
    log_error!(
      "Point destroy ({}, {}), buffer sum = {}",
      self.x,
      self.y,
      self.memory_block.iter().sum::<i32>()
    );
  }
}

impl fmt::Display for Point {
  fn fmt(
    &self,
    f: &mut fmt::Formatter<'_>,
  ) -> fmt::Result {
    write!(f, "X: {}  Y: {}", self.x, self.y)
  }
}

fn print_array<T: fmt::Display>(array: &DynamicArray<T>) {
  for value in array {
    println!("{value}");
  }
  println!("---------------------------------");
}

fn main() {
  // RARRAY_LOG=off silences the demo, RARRAY_LOG=warn keeps reallocations.
  if let Err(e) = log::init_from_env() {
    eprintln!("{e}, logging disabled");
  }

  {
    let mut points = DynamicArray::from([Point::new(5, 5), Point::new(6, 6)]);

    points.emplace_at(1, || Point::new(10, 10));
    print_array(&points);

    points.insert_at(1, Point::new(15, 15));
    print_array(&points);

    let mut it = points.cbegin();
    while it != points.cend() {
      println!("{}", *it);
      it.inc();
    }

    // Copies are independent: popping from one leaves the other alone.
    let mut copy = points.clone();
    copy.pop_back();
    println!("\noriginal holds {}, copy holds {}", points.len(), copy.len());

    // Taking leaves a valid, empty, unallocated source behind.
    let moved = points.take();
    println!(
      "moved holds {}, source holds {} (capacity {})",
      moved.len(),
      points.len(),
      points.capacity()
    );
  }

  log::shutdown();
}
