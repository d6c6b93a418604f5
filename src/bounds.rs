use std::fmt;

/// Element count bounds of an array container: `min <= count <= max`, starting at `reserved`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountBounds {
	pub min: usize,
	pub max: usize,
	pub reserved: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Inconsistent count bounds {0}")]
pub struct InvalidBoundsError(pub CountBounds);

impl CountBounds {
	pub const fn new(min: usize, max: usize, reserved: usize) -> Self {
		Self { min, max, reserved }
	}

	/// Bounds without any limit, starting empty.
	pub const fn unbounded() -> Self {
		Self::new(0, usize::MAX, 0)
	}

	pub fn validate(&self) -> Result<(), InvalidBoundsError> {
		if self.min > self.max || self.reserved > self.max {
			return Err(InvalidBoundsError(*self));
		}
		Ok(())
	}

	pub fn contains(&self, count: usize) -> bool {
		(self.min..=self.max).contains(&count)
	}

	/// Count to start with. May be below `min`; containers are checked against `min` on init.
	pub fn initial(&self) -> usize {
		self.reserved
	}

	/// Whether a container may grow to `count` elements.
	pub fn allows_growth_to(&self, count: usize) -> bool {
		count <= self.max
	}
}

impl Default for CountBounds {
	fn default() -> Self {
		Self::unbounded()
	}
}

impl fmt::Display for CountBounds {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "[{}, {}] (reserved {})", self.min, self.max, self.reserved)
	}
}

#[cfg(test)]
mod tests {
	use super::CountBounds;

	#[test]
	fn validate_and_contain() {
		let bounds = CountBounds::new(1, 4, 0);
		assert!(bounds.validate().is_ok());
		assert!(!bounds.contains(0));
		assert!(bounds.contains(4));
		assert!(!bounds.contains(5));
		assert_eq!(bounds.initial(), 0);
		assert!(bounds.allows_growth_to(1));
		assert!(!bounds.allows_growth_to(5));
		assert_eq!(CountBounds::new(1, 4, 2).initial(), 2);

		assert!(CountBounds::new(3, 2, 0).validate().is_err());
		assert!(CountBounds::new(0, 2, 3).validate().is_err());
	}
}
