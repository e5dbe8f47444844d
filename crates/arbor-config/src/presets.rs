//! Built-in plant presets.

use crate::Config;
use crate::error::ConfigError;

/// A named set of grammar, turtle and color settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Preset {
    pub name: &'static str,
    pub axiom: &'static str,
    pub rules: &'static str,
    pub angle_deg: f32,
    pub variance_deg: f32,
    pub iterations: u32,
    pub step_length: f32,
    pub base_width: f32,
    pub taper: f32,
    pub base_color: &'static str,
    pub tip_color: &'static str,
    pub leaf_color: &'static str,
}

/// Every built-in preset. The first is the default configuration.
pub const PRESETS: [Preset; 10] = [
    Preset {
        name: "tree1",
        axiom: "X",
        rules: "X=F-[![X]+X]+F[+F!X]-X\nF=FF",
        angle_deg: 22.5,
        variance_deg: 2.0,
        iterations: 6,
        step_length: 1.5,
        base_width: 0.961,
        taper: 0.69,
        base_color: "#5d4037",
        tip_color: "#22c55e",
        leaf_color: "#f0abfc",
    },
    Preset {
        name: "tree2",
        axiom: "F",
        rules: "F=FF!+[+F-F-F]-[-F+F+F]",
        angle_deg: 25.0,
        variance_deg: 0.0,
        iterations: 4,
        step_length: 2.0,
        base_width: 0.732,
        taper: 0.95,
        base_color: "#2d1b0e",
        tip_color: "#84cc16",
        leaf_color: "#facc15",
    },
    Preset {
        name: "pine",
        axiom: "FX",
        rules: "X=![+FX][-FX][&FX][^FX]\nF=FF",
        angle_deg: 22.0,
        variance_deg: 14.0,
        iterations: 8,
        step_length: 0.5,
        base_width: 6.699,
        taper: 0.58,
        base_color: "#3f2e18",
        tip_color: "#05850d",
        leaf_color: "#05850d",
    },
    Preset {
        name: "fern",
        axiom: "X",
        rules: "X=F[+!X][ -!X]F!X\nF=FF",
        angle_deg: 25.0,
        variance_deg: 0.0,
        iterations: 6,
        step_length: 1.0,
        base_width: 0.905,
        taper: 0.7,
        base_color: "#1a642e",
        tip_color: "#22c55e",
        leaf_color: "#ccfbf1",
    },
    Preset {
        name: "fern3d",
        axiom: "X",
        rules: "X=F///+[[!X]///-!X]///-F[///-F!X]///+!X\nF=FF",
        angle_deg: 22.5,
        variance_deg: 6.0,
        iterations: 7,
        step_length: 0.1,
        base_width: 0.370,
        taper: 0.81,
        base_color: "#2e5c18",
        tip_color: "#22c55e",
        leaf_color: "#86efac",
    },
    Preset {
        name: "bush",
        axiom: "A",
        rules: "A=[&FL!A]/////'[&FL!A]///////'[&FL!A]\nF=S/////F\nS=FL\nL=['''^^{-f+f+f-|-f+f+f}]",
        angle_deg: 22.5,
        variance_deg: 0.0,
        iterations: 6,
        step_length: 2.0,
        base_width: 0.607,
        taper: 0.61,
        base_color: "#3f2e18",
        tip_color: "#0cad00",
        leaf_color: "#f43f5e",
    },
    Preset {
        name: "spire",
        axiom: "F",
        rules: "F=F[&+F][&-F][^+F][^-F]//F",
        angle_deg: 28.5,
        variance_deg: 2.0,
        iterations: 6,
        step_length: 2.0,
        base_width: 0.17,
        taper: 1.0,
        base_color: "#4a4036",
        tip_color: "#a8a8a0",
        leaf_color: "#ffcc00",
    },
    Preset {
        name: "hilbert",
        axiom: "A",
        rules: "A=B-F+CFC+F-D&F^D-F+&&CFC+F+B//\n\
                B=A&F^CFB^F^D^^-F-D^|F^B|FC^F^A//\n\
                C=|D^|F^B-F+C^F^A&&FA&F^C+F+B^F^D//\n\
                D=|CFB-F+B|FA&F^A&&FB-F+B|FC//",
        angle_deg: 90.0,
        variance_deg: 0.0,
        iterations: 3,
        step_length: 4.0,
        base_width: 0.2,
        taper: 1.0,
        base_color: "#0ea5e9",
        tip_color: "#d946ef",
        leaf_color: "#ffffff",
    },
    Preset {
        name: "twisted",
        axiom: "F",
        rules: "F=F[&+F][&-F]///F",
        angle_deg: 30.0,
        variance_deg: 0.0,
        iterations: 5,
        step_length: 2.0,
        base_width: 0.15,
        taper: 1.0,
        base_color: "#44403c",
        tip_color: "#a8a29e",
        leaf_color: "#fbbf24",
    },
    Preset {
        name: "barnsley",
        axiom: "X",
        rules: "X=F+[[!X]-!X]-F[-F!X]+!X\nF=FF",
        angle_deg: 25.0,
        variance_deg: 0.0,
        iterations: 7,
        step_length: 1.5,
        base_width: 3.754,
        taper: 0.73,
        base_color: "#14532d",
        tip_color: "#22c55e",
        leaf_color: "#86efac",
    },
];

/// Looks up a preset by name, ignoring ASCII case.
pub fn find_preset(name: &str) -> Option<&'static Preset> {
    let name = name.trim();
    PRESETS.iter().find(|p| p.name.eq_ignore_ascii_case(name))
}

impl Config {
    /// Overwrites grammar, turtle and color settings with a preset.
    /// Leaf scale, tips-only, render mode and limits are left alone;
    /// auto-scale is switched back on.
    pub fn apply_preset(&mut self, name: &str) -> Result<(), ConfigError> {
        let Some(preset) = find_preset(name) else {
            return Err(ConfigError::UnknownPreset(name.to_string()));
        };

        self.grammar.axiom = preset.axiom.to_string();
        self.grammar.rules = preset.rules.to_string();
        self.grammar.iterations = preset.iterations;

        self.turtle.angle_deg = preset.angle_deg;
        self.turtle.variance_deg = preset.variance_deg;
        self.turtle.step_length = preset.step_length;
        self.turtle.base_width = preset.base_width;
        self.turtle.taper = preset.taper;

        self.render.base_color = preset.base_color.to_string();
        self.render.tip_color = preset.tip_color.to_string();
        self.render.leaf_color = preset.leaf_color.to_string();
        self.render.auto_scale = true;

        log::info!("Applied preset {}", preset.name);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse_hex_color;

    #[test]
    fn test_names_are_unique() {
        for (i, a) in PRESETS.iter().enumerate() {
            for b in &PRESETS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_preset_colors_parse() {
        for p in &PRESETS {
            for c in [p.base_color, p.tip_color, p.leaf_color] {
                assert!(parse_hex_color(c).is_ok(), "{}: {c}", p.name);
            }
        }
    }

    #[test]
    fn test_preset_rules_are_well_formed() {
        for p in &PRESETS {
            for line in p.rules.lines() {
                let (lhs, rhs) = line.split_once('=').unwrap();
                assert_eq!(lhs.trim().chars().count(), 1, "{}: {line}", p.name);
                assert!(!rhs.trim().is_empty());
            }
        }
    }

    #[test]
    fn test_find_preset() {
        assert_eq!(find_preset("pine").unwrap().iterations, 8);
        assert_eq!(find_preset("Fern3D").unwrap().name, "fern3d");
        assert!(find_preset("oak").is_none());
    }

    #[test]
    fn test_hilbert_has_four_rules() {
        assert_eq!(find_preset("hilbert").unwrap().rules.lines().count(), 4);
    }

    #[test]
    fn test_apply_preset() {
        let mut config = Config::default();
        config.turtle.leaf_scale = 2.0;
        config.render.auto_scale = false;
        config.apply_preset("spire").unwrap();
        assert_eq!(config.grammar.axiom, "F");
        assert_eq!(config.turtle.angle_deg, 28.5);
        assert_eq!(config.turtle.variance_deg, 2.0);
        assert_eq!(config.turtle.leaf_scale, 2.0);
        assert!(config.render.auto_scale);
        assert_eq!(config.render.leaf_color, "#ffcc00");
    }

    #[test]
    fn test_apply_unknown_preset() {
        let mut config = Config::default();
        let before = config.clone();
        assert!(matches!(
            config.apply_preset("oak"),
            Err(ConfigError::UnknownPreset(name)) if name == "oak"
        ));
        assert_eq!(config, before);
    }

    #[test]
    fn test_default_matches_first_preset() {
        let mut config = Config::default();
        let before = config.clone();
        config.apply_preset(PRESETS[0].name).unwrap();
        assert_eq!(config, before);
    }
}
