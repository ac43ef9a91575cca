//! `vista baseline`: list, inspect and remove stored baselines

use super::Outcome;
use crate::commands::{BaselineAction, BaselineArgs};
use crate::config::CliConfig;
use crate::error::{CliError, CliResult};
use crate::output::ProgressReporter;
use vista::{BaselineStore, FsBaselineStore, TestIdentity, VistaConfig};

/// Execute a baseline subcommand
pub fn execute_baseline(
    config: &CliConfig,
    vista: VistaConfig,
    args: &BaselineArgs,
) -> CliResult<Outcome> {
    let dir = args.baselines.clone().unwrap_or(vista.baselines_dir);
    let mut store = FsBaselineStore::open(dir)?;
    let reporter = ProgressReporter::new(config.color.should_color(), config.verbosity.is_quiet());

    for line in baseline_lines(&mut store, &args.action)? {
        println!("{line}");
    }
    if matches!(args.action, BaselineAction::List) && store.identities()?.is_empty() {
        reporter.info(&format!("No baselines in {}", store.dir().display()));
    }
    Ok(Outcome::Success)
}

/// Carry out `action`, returning the lines to print
pub fn baseline_lines(
    store: &mut FsBaselineStore,
    action: &BaselineAction,
) -> CliResult<Vec<String>> {
    match action {
        BaselineAction::List => Ok(store
            .identities()?
            .into_iter()
            .map(|id| id.to_string())
            .collect()),
        BaselineAction::Remove { name } => {
            let id = identity(name)?;
            store.remove(&id)?;
            Ok(vec![format!("Removed baseline '{id}'")])
        }
        BaselineAction::Show { name } => {
            let id = identity(name)?;
            let image = store.load(&id)?;
            let path = store.path_for(&id);
            let bytes = std::fs::metadata(&path)?.len();
            Ok(vec![
                format!("name: {id}"),
                format!("path: {}", path.display()),
                format!("size: {}x{}", image.width(), image.height()),
                format!("bytes: {bytes}"),
            ])
        }
    }
}

fn identity(name: &str) -> CliResult<TestIdentity> {
    TestIdentity::new(name).map_err(|e| CliError::invalid_argument(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use tempfile::TempDir;

    fn store_with(names: &[&str]) -> (TempDir, FsBaselineStore) {
        let dir = TempDir::new().unwrap();
        let mut store = FsBaselineStore::open(dir.path()).unwrap();
        for name in names {
            let id = TestIdentity::new(*name).unwrap();
            store
                .create(&id, &RgbImage::from_pixel(12, 8, Rgb([1, 2, 3])))
                .unwrap();
        }
        (dir, store)
    }

    #[test]
    fn test_list_sorted() {
        let (_dir, mut store) = store_with(&["cart", "about"]);
        let lines = baseline_lines(&mut store, &BaselineAction::List).unwrap();
        assert_eq!(lines, vec!["about", "cart"]);
    }

    #[test]
    fn test_show_details() {
        let (_dir, mut store) = store_with(&["cart"]);
        let lines = baseline_lines(
            &mut store,
            &BaselineAction::Show {
                name: "cart".to_string(),
            },
        )
        .unwrap();
        assert_eq!(lines[0], "name: cart");
        assert!(lines[1].ends_with("cart_baseline.png"));
        assert_eq!(lines[2], "size: 12x8");
    }

    #[test]
    fn test_remove_then_missing() {
        let (_dir, mut store) = store_with(&["cart"]);
        let remove = BaselineAction::Remove {
            name: "cart".to_string(),
        };
        baseline_lines(&mut store, &remove).unwrap();
        assert!(baseline_lines(&mut store, &remove).is_err());
        assert!(baseline_lines(&mut store, &BaselineAction::List)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_invalid_name() {
        let (_dir, mut store) = store_with(&[]);
        let err = baseline_lines(
            &mut store,
            &BaselineAction::Show {
                name: String::new(),
            },
        )
        .unwrap_err();
        assert!(matches!(err, CliError::InvalidArgument { .. }));
    }
}
