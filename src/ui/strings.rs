//! Localized string lookup
//!
//! Strings are addressed by dotted keys (`combat.round`). The built-in table is
//! English; a TOML file of nested tables can override any entry.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use figment::value::{Dict, Value};
use tracing::warn;

use crate::config::{load_figment, LoadError};

/// Key to text lookup service
pub trait StringTable: Send + Sync {
    /// Look up `key`. Missing keys yield the key itself.
    fn get(&self, key: &str) -> String;
}

/// A positional formatting argument
#[derive(Debug, Clone, Copy)]
pub enum Arg<'a> {
    /// Substituted for `%d`
    Int(i64),
    /// Substituted for `%s`
    Str(&'a str),
    /// Substituted for `%c`
    Char(char),
}

impl From<i64> for Arg<'_> {
    fn from(v: i64) -> Self {
        Arg::Int(v)
    }
}

impl From<i32> for Arg<'_> {
    fn from(v: i32) -> Self {
        Arg::Int(i64::from(v))
    }
}

impl From<u32> for Arg<'_> {
    fn from(v: u32) -> Self {
        Arg::Int(i64::from(v))
    }
}

impl<'a> From<&'a str> for Arg<'a> {
    fn from(v: &'a str) -> Self {
        Arg::Str(v)
    }
}

impl From<char> for Arg<'_> {
    fn from(v: char) -> Self {
        Arg::Char(v)
    }
}

/// Substitute `%d`, `%s` and `%c` placeholders in order. `%%` is a literal `%`.
///
/// Placeholders without a matching argument are left as written.
pub fn format(template: &str, args: &[Arg<'_>]) -> String {
    let mut out = String::with_capacity(template.len() + 16);
    let mut args = args.iter();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch != '%' {
            out.push(ch);
            continue;
        }
        match chars.peek().copied() {
            Some('%') => {
                chars.next();
                out.push('%');
            }
            Some(spec @ ('d' | 's' | 'c')) => {
                chars.next();
                match args.next() {
                    Some(Arg::Int(v)) => {
                        let _ = write!(out, "{}", v);
                    }
                    Some(Arg::Str(s)) => out.push_str(s),
                    Some(Arg::Char(c)) => out.push(*c),
                    None => {
                        out.push('%');
                        out.push(spec);
                    }
                }
            }
            _ => out.push('%'),
        }
    }

    out
}

const ENGLISH: &[(&str, &str)] = &[
    ("combat.combat", "COMBAT"),
    ("combat.round", "ROUND #"),
    ("combat.delay", "D) DELAY"),
    ("combat.protect", "P) PROTECT"),
    ("combat.quickref", "Q) QUICKREF"),
    ("combat.view_char", "#) VIEW CHAR"),
    ("combat.handicap", "HANDICAP"),
    ("combat.even", "EVEN"),
    ("combat.party_plus", "PARTY +"),
    ("combat.monster_plus", "MONSTER +"),
    ("combat.advances", "ADVANCES!"),
    ("combat.options_for", "OPTIONS FOR:"),
    ("combat.attack", "A) ATTACK"),
    ("combat.fight", "F) FIGHT"),
    ("combat.shoot", "S) SHOOT"),
    ("combat.cast", "C) CAST"),
    ("combat.exchange_use", "E) EXCHANGE U) USE"),
    ("combat.retreat_block", "R) RETREAT B) BLOCK"),
    ("combat.set_delay", "SET DELAY (0-9)"),
    ("combat.delay_currently", "CURRENTLY: %d"),
    ("combat.exchange_places", "EXCHANGE PLACES WITH (1-%c)"),
    ("combat.fight_which", "FIGHT WHICH (A-%c)"),
    ("combat.shoot_which", "SHOOT WHICH (A-%c)"),
    ("combat.cast_which", "CAST WHICH (1-%d)"),
    ("combat.esc", "ESC TO GO BACK"),
    ("combat.status.paralyzed", "PARALYZED"),
    ("combat.status.webbed", "WEBBED"),
    ("combat.status.held", "HELD"),
    ("combat.status.asleep", "ASLEEP"),
    ("combat.status.mindless", "MINDLESS"),
    ("combat.status.silenced", "SILENCED"),
    ("combat.status.blinded", "BLINDED"),
    ("combat.status.afraid", "AFRAID"),
    ("combat.status.dead", "DEAD"),
    ("combat.status.wounded", "WOUNDED"),
    ("combat.defeating1", "DEFEATING ALL MONSTERS"),
    ("combat.defeating2", "THE PARTY EARNS"),
    ("combat.xp", "EXPERIENCE"),
    ("combat.regenerate", "MONSTERS REGENERATE!"),
    ("combat.overcome", "MONSTERS OVERCOME SPELLS!"),
    ("combat.monster_flees", "FLEES!"),
    ("combat.monster_wanders", "WANDERS AIMLESSLY"),
    ("combat.infiltration", "INFILTRATES THE PARTY!"),
    ("combat.waits_for_opening", "WAITS FOR AN OPENING"),
    ("combat.attack_types.0", "ATTACKS"),
    ("combat.attack_types.1", "BITES"),
    ("combat.attack_types.2", "CLAWS AT"),
    ("combat.attack_types.3", "STINGS"),
    ("combat.attack_types.4", "KICKS"),
    ("combat.attack_types.5", "STRIKES AT"),
    ("combat.attack_types.6", "GRABS"),
    ("combat.attack_types.7", "BREATHES ON"),
    ("combat.shoots", "SHOOTS"),
    ("combat.attacks", "ATTACKS"),
    ("combat.goes_down", "GOES DOWN!!!"),
    ("combat.weapon_no_effect", "WEAPON HAS NO EFFECT!"),
    ("combat.once", "ONCE"),
    ("combat.times", "TIMES"),
    ("combat.and", "AND"),
    ("combat.misses", "MISSES"),
    ("combat.hit", "HITS"),
    ("combat.for", "FOR"),
    ("combat.point", "POINT"),
    ("combat.points", "POINTS"),
    ("combat.of_damage", "OF DAMAGE"),
    ("combat.unconscious", "%s GOES UNCONSCIOUS!"),
    ("combat.killed", "%s IS KILLED!"),
    ("combat.touch.poison", "%s IS POISONED!"),
    ("combat.touch.paralyze", "%s IS PARALYZED!"),
    ("combat.touch.sleep", "%s FALLS ASLEEP!"),
    ("combat.touch.drain", "%s IS DRAINED OF SPELL POINTS!"),
    ("combat.touch.crush", "A CRUSHING BLOW!"),
    ("combat.not_enough_sp", "NOT ENOUGH SPELL POINTS"),
    ("combat.couldnt_escape", "THE PARTY COULDN'T ESCAPE!"),
    ("combat.spell.casts", "%s CASTS %s"),
    ("combat.spell.takes_damage", "%s TAKES %d DAMAGE"),
    ("combat.spell.falls_asleep", "%s FALLS ASLEEP"),
    ("combat.spell.resists", "%s RESISTS"),
    ("combat.spell.drained", "%s LOSES ALL SPELL POINTS"),
    ("combat.spell.healed", "%s IS HEALED %d POINTS"),
    ("combat.spell.awakened", "THE PARTY AWAKENS"),
    ("combat.spell.silenced", "%s IS SILENCED"),
    ("combat.spell.no_effect", "NO EFFECT"),
    ("spells.sleep", "SLEEP"),
    ("spells.flame_arrow", "FLAME ARROW"),
    ("spells.cure_wounds", "CURE WOUNDS"),
    ("spells.awaken", "AWAKEN"),
    ("spells.silence", "SILENCE"),
    ("spells.fire_blast", "FIRE BLAST"),
    ("spells.mass_sleep", "MASS SLEEP"),
    ("spells.drain", "DRAIN"),
];

/// In-memory string table
#[derive(Debug, Clone, Default)]
pub struct Strings {
    entries: HashMap<String, String>,
}

impl Strings {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English table
    pub fn english() -> Self {
        let entries = ENGLISH
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { entries }
    }

    /// Load a table from a TOML file of nested tables
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let dict: Dict = load_figment(path)?
            .extract()
            .map_err(|e| LoadError::Parse {
                path: path.to_path_buf(),
                source: e,
            })?;

        let mut strings = Self::new();
        flatten_into(&mut strings.entries, "", &dict);
        Ok(strings)
    }

    /// Set or replace an entry
    pub fn insert(&mut self, key: impl Into<String>, text: impl Into<String>) {
        self.entries.insert(key.into(), text.into());
    }

    /// Layer `other` over this table
    pub fn merged(mut self, other: Strings) -> Self {
        self.entries.extend(other.entries);
        self
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn flatten_into(entries: &mut HashMap<String, String>, prefix: &str, dict: &Dict) {
    for (key, value) in dict {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{}.{}", prefix, key)
        };
        match value {
            Value::String(_, s) => {
                entries.insert(full, s.clone());
            }
            Value::Dict(_, nested) => flatten_into(entries, &full, nested),
            _ => warn!("ignoring non-string entry {}", full),
        }
    }
}

impl StringTable for Strings {
    fn get(&self, key: &str) -> String {
        match self.entries.get(key) {
            Some(text) => text.clone(),
            None => {
                warn!("missing string {}", key);
                key.to_string()
            }
        }
    }
}
