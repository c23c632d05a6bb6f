use gloo::storage::{LocalStorage, Storage};
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Namespaced localStorage slot for a serializable value.
pub(crate) trait StorageKey: Serialize + DeserializeOwned + Sized {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T: StorageKey> LocalOrDefault for Option<T> {
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).ok()
    }

    fn local_save(&self) {
        match self {
            Some(value) => {
                if let Err(err) = LocalStorage::set(T::KEY, value) {
                    log::error!("failed to save {}: {:?}", T::KEY, err);
                }
            }
            None => LocalStorage::delete(T::KEY),
        }
    }
}

/// Seed material from JavaScript's Math.random.
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;

    let mut bytes = [0u8; 8];
    for byte in &mut bytes {
        *byte = (256.0 * random()) as u8;
    }
    u64::from_be_bytes(bytes)
}
