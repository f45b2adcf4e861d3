use gloo::storage::{LocalStorage, Storage};
use macrodata_core as game;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Namespaced `localStorage` key for a persisted value.
pub(crate) trait StorageKey {
    const KEY: &'static str;
}

pub(crate) trait LocalOrDefault {
    fn local_or_default() -> Self;
    fn local_save(&self);
}

impl<T> LocalOrDefault for T
where
    T: StorageKey + Default + Serialize + DeserializeOwned,
{
    fn local_or_default() -> Self {
        LocalStorage::get(T::KEY).unwrap_or_else(|err| {
            log::debug!("no usable {}: {}", T::KEY, err);
            T::default()
        })
    }

    fn local_save(&self) {
        if let Err(err) = LocalStorage::set(T::KEY, self) {
            log::error!("failed to save {}: {}", T::KEY, err);
        }
    }
}

impl StorageKey for game::BoxFills {
    const KEY: &'static str = "macrodata:progress:v1";
}

/// Engine rejections are policy no-ops for the player, so they never trigger a redraw.
pub(crate) trait HasUpdate {
    fn has_update(self) -> bool;
}

impl<E: core::fmt::Display> HasUpdate for Result<game::SelectOutcome, E> {
    fn has_update(self) -> bool {
        match self {
            Ok(outcome) => outcome.has_update(),
            Err(err) => {
                log::trace!("selection ignored: {}", err);
                false
            }
        }
    }
}

impl<E: core::fmt::Display> HasUpdate for Result<game::Step, E> {
    fn has_update(self) -> bool {
        match self {
            Ok(step) => step.has_update(),
            Err(err) => {
                log::debug!("action ignored: {}", err);
                false
            }
        }
    }
}

/// Helper function to use JavaScript's Math.random
pub(crate) fn js_random_seed() -> u64 {
    use js_sys::Math::random;
    u64::from_be_bytes([
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
        (256. * random()) as u8,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn progress_key_is_versioned() {
        assert_eq!(<game::BoxFills as StorageKey>::KEY, "macrodata:progress:v1");
    }

    #[test]
    fn rejections_are_not_updates() {
        let rejected: Result<game::Step, game::GameError> = Err(game::GameError::WrongPhase);
        assert!(!rejected.has_update());

        let empty: Result<game::Step, game::GameError> = Ok(game::Step::default());
        assert!(!empty.has_update());

        let picked: Result<game::SelectOutcome, game::GameError> = Ok(game::SelectOutcome::Selected);
        assert!(picked.has_update());
    }

    #[cfg(target_arch = "wasm32")]
    mod browser {
        use super::*;
        use game::BoxStore;
        use wasm_bindgen_test::*;

        wasm_bindgen_test_configure!(run_in_browser);

        #[wasm_bindgen_test]
        fn progress_survives_a_reload() {
            LocalStorage::delete(game::BoxFills::KEY);
            assert_eq!(game::BoxFills::local_or_default(), game::BoxFills::default());

            let mut fills = game::BoxFills::default();
            fills.commit_increment(2, 25).unwrap();
            fills.local_save();

            let raw = LocalStorage::raw()
                .get_item(game::BoxFills::KEY)
                .unwrap()
                .unwrap();
            let stored: serde_json::Value = serde_json::from_str(&raw).unwrap();
            assert_eq!(stored, serde_json::json!({ "fills": [0, 0, 25, 0] }));
            assert_eq!(game::BoxFills::local_or_default(), fills);

            LocalStorage::delete(game::BoxFills::KEY);
        }
    }
}
