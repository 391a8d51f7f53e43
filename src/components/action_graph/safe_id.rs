//! Canvas-safe node identifiers.
//!
//! Raw node ids carry URLs, selectors and free text. The render layer keys
//! nodes by a short `n<base36>` id derived from a 32-bit FNV-1a hash instead.

use std::collections::HashMap;

const FNV_OFFSET: u32 = 0x811c_9dc5;
const FNV_PRIME: u32 = 0x0100_0193;

pub fn fnv1a_32(raw: &str) -> u32 {
	raw.bytes()
		.fold(FNV_OFFSET, |hash, byte| (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME))
}

pub fn base36(mut value: u32) -> String {
	const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";
	if value == 0 {
		return "0".into();
	}
	let mut out = Vec::new();
	while value > 0 {
		out.push(DIGITS[(value % 36) as usize]);
		value /= 36;
	}
	out.reverse();
	String::from_utf8(out).unwrap_or_default()
}

pub fn safe_id(raw: &str) -> String {
	format!("n{}", base36(fnv1a_32(raw)))
}

/// Two distinct raw ids hashed to the same safe id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SafeIdCollision {
	pub safe_id: String,
	pub first: String,
	pub second: String,
}

/// Injective raw → safe mapping for one layout pass.
///
/// The first raw id to claim a hash keeps the plain safe id; later colliders
/// get a `-N` suffix and the collision is recorded.
#[derive(Debug, Default)]
pub struct SafeIdTable {
	by_raw: HashMap<String, String>,
	owners: HashMap<String, String>,
	collisions: Vec<SafeIdCollision>,
}

impl SafeIdTable {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn intern(&mut self, raw: &str) -> String {
		if let Some(existing) = self.by_raw.get(raw) {
			return existing.clone();
		}
		let base = safe_id(raw);
		let mut candidate = base.clone();
		if let Some(owner) = self.owners.get(&base) {
			self.collisions.push(SafeIdCollision {
				safe_id: base.clone(),
				first: owner.clone(),
				second: raw.to_string(),
			});
			let mut n = 1;
			while self.owners.contains_key(&candidate) {
				candidate = format!("{base}-{n}");
				n += 1;
			}
		}
		self.owners.insert(candidate.clone(), raw.to_string());
		self.by_raw.insert(raw.to_string(), candidate.clone());
		candidate
	}

	pub fn get(&self, raw: &str) -> Option<&str> {
		self.by_raw.get(raw).map(String::as_str)
	}

	pub fn into_collisions(self) -> Vec<SafeIdCollision> {
		self.collisions
	}
}
