//! Test plan command

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use colored::Colorize;
use mqt_core::{MqtConfig, TestPlan, plan};
use mqt_fs::NormalizedPath;

use crate::error::Result;

/// Command line values taking precedence over the configuration file.
#[derive(Debug, Clone, Default)]
pub struct PlanOverrides {
    pub version: Option<String>,
    pub build_dir: Option<PathBuf>,
    pub home: Option<PathBuf>,
}

impl PlanOverrides {
    fn apply(self, config: &mut MqtConfig) {
        if let Some(version) = self.version {
            config.version = version;
        }
        if let Some(build_dir) = self.build_dir {
            config.build_dir = build_dir;
        }
        if let Some(home) = self.home {
            config.home = home;
        }
    }
}

/// Print the commands a test run would execute.
pub fn run_plan(config: Option<&Path>, overrides: PlanOverrides) -> Result<i32> {
    let mut config = match config {
        Some(path) => MqtConfig::load(&NormalizedPath::new(path))?,
        None => MqtConfig::default(),
    };
    overrides.apply(&mut config);

    let plan = plan(&config)?;
    if plan.is_empty() {
        println!("{} Nothing to test", "warning:".yellow().bold());
        return Ok(0);
    }

    print!("{}", format_plan(&plan));
    Ok(0)
}

fn format_plan(plan: &TestPlan) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Server: {} ({})", plan.server_path.join(plan.script), plan.version);
    let _ = writeln!(out, "Addons path: {}", plan.addons_path_arg());
    let _ = writeln!(out, "Modules: {}", plan.modules.join(","));
    let _ = writeln!(out, "Preinstall: {}", plan.preinstall.join(","));
    let _ = writeln!(out, "Setup:\n  {}", plan.setup);
    for run in &plan.runs {
        let _ = writeln!(out, "Test {}:", run.target);
        for step in &run.steps {
            let _ = writeln!(out, "  {}", step.command);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use mqt_test_utils::AddonTree;

    #[test]
    fn test_overrides_take_precedence() {
        let mut config = MqtConfig {
            version: "11.0".to_string(),
            home: PathBuf::from("/home/ci"),
            ..Default::default()
        };

        PlanOverrides {
            version: Some("12.0".to_string()),
            build_dir: Some(PathBuf::from("/build")),
            home: None,
        }
        .apply(&mut config);

        assert_eq!(config.version, "12.0");
        assert_eq!(config.build_dir, PathBuf::from("/build"));
        assert_eq!(config.home, PathBuf::from("/home/ci"));
    }

    #[test]
    fn test_format_plan() {
        let home = AddonTree::new();
        home.module("odoo-12.0/addons/sale", &[])
            .module("build/sale_x", &["sale"]);
        let config = MqtConfig {
            home: home.path().to_path_buf(),
            build_dir: home.path().join("build"),
            version: "12.0".to_string(),
            unbuffer: false,
            coverage: false,
            ..Default::default()
        };

        let text = format_plan(&plan(&config).unwrap());

        assert!(text.contains("Modules: sale_x\n"));
        assert!(text.contains("Preinstall: base,sale\n"));
        assert!(text.contains("Test sale_x:\n"));
        assert!(text.contains(&format!("Server: {} (12.0)", home.at("odoo-12.0/odoo-bin"))));
    }
}
