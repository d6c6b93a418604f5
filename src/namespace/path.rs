//! Node paths: `/` separated segments, `.` for the current namespace, `..` for the parent,
//! a leading `/` to start at the root.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
	Current,
	Parent,
	Name(&'a str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodePath<'a> {
	pub absolute: bool,
	pub segments: Vec<Segment<'a>>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PathError {
	#[error("Empty node path")]
	Empty,
	#[error("Empty segment in node path {0:?}")]
	EmptySegment(String),
}

impl<'a> NodePath<'a> {
	pub fn parse(path: &'a str) -> Result<Self, PathError> {
		if path.is_empty() {
			return Err(PathError::Empty);
		}

		let (absolute, rest) = match path.strip_prefix('/') {
			Some(rest) => (true, rest),
			None => (false, path),
		};
		if rest.is_empty() {
			return Ok(Self {
				absolute,
				segments: Vec::new(),
			});
		}

		let mut segments = Vec::new();
		for segment in rest.split('/') {
			segments.push(match segment {
				"" => return Err(PathError::EmptySegment(path.to_owned())),
				"." => Segment::Current,
				".." => Segment::Parent,
				name => Segment::Name(name),
			});
		}

		Ok(Self { absolute, segments })
	}

	/// Leading segments naming namespaces, and the final segment naming the target.
	pub fn split_last(&self) -> Option<(&Segment<'a>, &[Segment<'a>])> {
		self.segments.split_last()
	}
}

#[cfg(test)]
mod tests {
	use super::{NodePath, PathError, Segment};

	#[test]
	fn parse_paths() {
		let path = NodePath::parse("../a/./b").unwrap();
		assert!(!path.absolute);
		assert_eq!(
			path.segments,
			vec![Segment::Parent, Segment::Name("a"), Segment::Current, Segment::Name("b")]
		);

		let root = NodePath::parse("/").unwrap();
		assert!(root.absolute);
		assert!(root.segments.is_empty());

		assert_eq!(NodePath::parse("/x").unwrap().segments, vec![Segment::Name("x")]);
	}

	#[test]
	fn reject_malformed() {
		assert_eq!(NodePath::parse(""), Err(PathError::Empty));
		assert!(matches!(NodePath::parse("a//b"), Err(PathError::EmptySegment(_))));
		assert!(matches!(NodePath::parse("a/"), Err(PathError::EmptySegment(_))));
	}
}
