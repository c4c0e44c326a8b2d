//! File-backed [`CredentialStore`] that survives process restarts.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	auth::{CredentialPair, SessionIdentity},
	store::{
		self, CompareAndSwapOutcome, CredentialStore, Entries, StoreError, StoreFuture, StoreKey,
	},
};

/// Persists credential entries to a JSON object (key name to value) after each mutation.
///
/// Unknown keys found in an existing file are ignored on load and dropped on the next write.
#[derive(Clone, Debug)]
pub struct FileStore {
	path: PathBuf,
	inner: Arc<RwLock<Entries>>,
}
impl FileStore {
	/// Opens (or creates) a store at the provided path, eagerly loading existing data.
	pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
		let path = path.into();

		Self::ensure_parent_exists(&path)?;

		let snapshot = Self::load_snapshot(&path)?;

		Ok(Self { path, inner: Arc::new(RwLock::new(snapshot)) })
	}

	/// Location of the backing file.
	pub fn path(&self) -> &Path {
		&self.path
	}

	fn load_snapshot(path: &Path) -> Result<Entries, StoreError> {
		if !path.exists() {
			return Ok(Entries::new());
		}

		let bytes = fs::read(path).map_err(|e| StoreError::Backend {
			message: format!("Failed to read {}: {e}", path.display()),
		})?;

		if bytes.iter().all(u8::is_ascii_whitespace) {
			return Ok(Entries::new());
		}

		let raw: BTreeMap<String, String> =
			serde_json::from_slice(&bytes).map_err(|e| StoreError::Serialization {
				message: format!("Failed to parse {}: {e}", path.display()),
			})?;

		Ok(raw
			.into_iter()
			.filter_map(|(name, value)| StoreKey::from_name(&name).map(|key| (key, value)))
			.collect())
	}

	fn ensure_parent_exists(path: &Path) -> Result<(), StoreError> {
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| StoreError::Backend {
				message: format!("Failed to create store directory {}: {e}", parent.display()),
			})?;
		}

		Ok(())
	}

	fn persist_locked(&self, contents: &Entries) -> Result<(), StoreError> {
		Self::ensure_parent_exists(&self.path)?;

		let snapshot = contents
			.iter()
			.map(|(key, value)| (key.as_str(), value.as_str()))
			.collect::<BTreeMap<_, _>>();
		let serialized =
			serde_json::to_vec_pretty(&snapshot).map_err(|e| StoreError::Serialization {
				message: format!("Failed to serialize store snapshot: {e}"),
			})?;
		let mut tmp_path = self.path.clone();

		tmp_path.set_extension("tmp");

		{
			let mut file = File::create(&tmp_path).map_err(|e| StoreError::Backend {
				message: format!("Failed to create {}: {e}", tmp_path.display()),
			})?;

			file.write_all(&serialized).map_err(|e| StoreError::Backend {
				message: format!("Failed to write {}: {e}", tmp_path.display()),
			})?;
			file.sync_all().map_err(|e| StoreError::Backend {
				message: format!("Failed to sync {}: {e}", tmp_path.display()),
			})?;
		}

		fs::rename(&tmp_path, &self.path).map_err(|e| StoreError::Backend {
			message: format!("Failed to replace {}: {e}", self.path.display()),
		})
	}

	/// Applies `mutate` to a copy of the entries and swaps it in only once it is on disk.
	fn commit(&self, mutate: impl FnOnce(&mut Entries)) -> Result<(), StoreError> {
		let mut guard = self.inner.write();
		let mut staged = guard.clone();

		mutate(&mut staged);
		self.persist_locked(&staged)?;

		*guard = staged;

		Ok(())
	}
}
impl CredentialStore for FileStore {
	fn fetch(&self, key: StoreKey) -> StoreFuture<'_, Option<String>> {
		Box::pin(async move { Ok(self.inner.read().get(&key).cloned()) })
	}

	fn save_credentials(&self, credentials: CredentialPair) -> StoreFuture<'_, ()> {
		Box::pin(async move {
			self.commit(|entries| store::write_credentials(entries, credentials))
		})
	}

	fn rotate_credentials<'a>(
		&'a self,
		expected_refresh: &'a str,
		replacement: CredentialPair,
	) -> StoreFuture<'a, CompareAndSwapOutcome> {
		Box::pin(async move {
			let mut guard = self.inner.write();
			let mut staged = guard.clone();
			let outcome = store::rotate_credentials(&mut staged, expected_refresh, replacement);

			if matches!(outcome, CompareAndSwapOutcome::Updated) {
				self.persist_locked(&staged)?;

				*guard = staged;
			}

			Ok(outcome)
		})
	}

	fn save_identity(&self, identity: SessionIdentity) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.commit(|entries| store::write_identity(entries, identity)) })
	}

	fn clear(&self) -> StoreFuture<'_, ()> {
		Box::pin(async move { self.commit(store::clear_entries) })
	}
}
