use std::path::{Path, PathBuf};

use log::{error, info, warn};

use crate::errors::Result;
use crate::traits::{file_name, SpriteRepository};

pub const CATEGORIES: [&str; 3] = ["basic", "combat", "special"];

/// Which sprite types belong to which category, per character.
#[derive(Debug, Clone)]
pub struct SpriteCatalog {
    characters: Vec<(String, Vec<(String, Vec<String>)>)>,
}

impl SpriteCatalog {
    pub fn new() -> Self {
        Self {
            characters: Vec::new(),
        }
    }

    pub fn with_character(mut self, character: &str, categories: &[(&str, &[&str])]) -> Self {
        let categories = categories
            .iter()
            .map(|(category, types)| {
                (
                    category.to_string(),
                    types.iter().map(|t| t.to_string()).collect(),
                )
            })
            .collect();
        self.characters.push((character.to_string(), categories));
        self
    }

    pub fn characters(&self) -> impl Iterator<Item = &str> {
        self.characters.iter().map(|(name, _)| name.as_str())
    }

    /// Character whose `<name>_` prefix starts the file name.
    pub fn character_for(&self, file_name: &str) -> Option<&str> {
        self.characters()
            .find(|character| file_name.starts_with(&format!("{character}_")))
    }

    pub fn category_for(&self, character: &str, sprite_type: &str) -> Option<&str> {
        self.characters
            .iter()
            .find(|(name, _)| name == character)?
            .1
            .iter()
            .find(|(_, types)| types.iter().any(|t| t == sprite_type))
            .map(|(category, _)| category.as_str())
    }
}

impl Default for SpriteCatalog {
    fn default() -> Self {
        const BASIC: &[&str] = &["idle", "walk", "jump", "icon"];
        const COMBAT: &[&str] = &["attack", "hurt"];
        const SPECIAL: &[&str] = &["uppercut", "low", "double", "down"];

        let mut catalog = Self::new().with_character(
            "ninja",
            &[("basic", BASIC), ("combat", COMBAT), ("special", SPECIAL)],
        );
        for character in ["mage", "warrior", "robot"] {
            catalog = catalog.with_character(character, &[("basic", BASIC), ("combat", COMBAT)]);
        }
        catalog
    }
}

/// `ninja_walk12.png` -> `walk`: drop the character prefix, the extension and
/// the trailing frame number.
pub fn sprite_type<'a>(file_name: &'a str, character: &str) -> &'a str {
    let stem = file_name
        .strip_prefix(character)
        .and_then(|rest| rest.strip_prefix('_'))
        .unwrap_or(file_name);
    let stem = stem.split('.').next().unwrap_or(stem);
    stem.trim_end_matches(|c: char| c.is_ascii_digit())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    Moved { from: PathBuf, to: PathBuf },
    UnknownCharacter(String),
    UnknownType { file: String, sprite_type: String },
    Failed { file: String, reason: String },
}

#[derive(Debug, Clone, Default)]
pub struct OrganizeReport {
    pub placements: Vec<Placement>,
}

impl OrganizeReport {
    pub fn moved(&self) -> usize {
        self.placements
            .iter()
            .filter(|p| matches!(p, Placement::Moved { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.placements.len() - self.moved()
    }
}

/// Move loose sprites into `<character>/<category>/`.
pub fn organize_sprites<R: SpriteRepository + ?Sized>(
    repo: &R,
    base_dir: &Path,
    catalog: &SpriteCatalog,
) -> Result<OrganizeReport> {
    let mut report = OrganizeReport::default();

    for path in repo.list_pngs(base_dir, "")? {
        let name = file_name(&path);

        let Some(character) = catalog.character_for(&name) else {
            warn!("unrecognised sprite: {name}");
            report.placements.push(Placement::UnknownCharacter(name));
            continue;
        };

        let kind = sprite_type(&name, character);
        let Some(category) = catalog.category_for(character, kind) else {
            warn!("no category for {name} (type: {kind})");
            report.placements.push(Placement::UnknownType {
                sprite_type: kind.to_string(),
                file: name,
            });
            continue;
        };

        let destination = base_dir.join(character).join(category).join(&name);
        match repo.move_file(&path, &destination) {
            Ok(()) => {
                info!("{name} -> {character}/{category}/");
                report.placements.push(Placement::Moved {
                    from: path,
                    to: destination,
                });
            }
            Err(e) => {
                error!("could not move {name}: {e}");
                report.placements.push(Placement::Failed {
                    file: name,
                    reason: e.to_string(),
                });
            }
        }
    }

    Ok(report)
}

/// Log the resulting `<character>/<category>` tree.
pub fn log_structure<R: SpriteRepository + ?Sized>(
    repo: &R,
    base_dir: &Path,
    catalog: &SpriteCatalog,
) {
    for character in catalog.characters() {
        let mut header_logged = false;
        for category in CATEGORIES {
            let dir = base_dir.join(character).join(category);
            let sprites = repo.list_pngs(&dir, "").unwrap_or_default();
            if sprites.is_empty() {
                continue;
            }
            if !header_logged {
                info!("{}:", character.to_uppercase());
                header_logged = true;
            }
            info!("  {category}: {} sprites", sprites.len());
            for sprite in &sprites {
                info!("    - {}", file_name(sprite));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::InMemorySpriteRepository;
    use image::RgbaImage;

    #[test]
    fn test_sprite_type() {
        assert_eq!(sprite_type("ninja_walk12.png", "ninja"), "walk");
        assert_eq!(sprite_type("ninja_icon.png", "ninja"), "icon");
        assert_eq!(sprite_type("mage_attack3.png", "mage"), "attack");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = SpriteCatalog::default();
        assert_eq!(catalog.character_for("warrior_hurt.png"), Some("warrior"));
        assert_eq!(catalog.character_for("ghost_idle.png"), None);
        assert_eq!(catalog.category_for("ninja", "uppercut"), Some("special"));
        assert_eq!(catalog.category_for("mage", "uppercut"), None);
        assert_eq!(catalog.category_for("robot", "attack"), Some("combat"));
    }

    #[test]
    fn test_organize_moves_known_sprites() -> Result<()> {
        let sprite = RgbaImage::new(2, 2);
        let repo = InMemorySpriteRepository::new()
            .with_image("chars/ninja_idle1.png", sprite.clone())
            .with_image("chars/ninja_uppercut2.png", sprite.clone())
            .with_image("chars/mage_attack.png", sprite.clone())
            .with_image("chars/mage_uppercut.png", sprite.clone())
            .with_image("chars/ghost_idle.png", sprite);

        let report = organize_sprites(&repo, Path::new("chars"), &SpriteCatalog::default())?;

        assert_eq!(report.moved(), 3);
        assert_eq!(report.skipped(), 2);
        assert!(repo.exists(Path::new("chars/ninja/basic/ninja_idle1.png")));
        assert!(repo.exists(Path::new("chars/ninja/special/ninja_uppercut2.png")));
        assert!(repo.exists(Path::new("chars/mage/combat/mage_attack.png")));
        assert!(repo.exists(Path::new("chars/mage_uppercut.png")));
        assert!(repo.exists(Path::new("chars/ghost_idle.png")));
        Ok(())
    }
}
