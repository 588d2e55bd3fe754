/// Perimeter of an `x` by `y` rectangle.
pub fn perimeter(x: f64, y: f64) -> f64 {
    (x + y) * 2.0
}

/// Area of an `x` by `y` rectangle.
pub fn area(x: f64, y: f64) -> f64 {
    x * y
}
