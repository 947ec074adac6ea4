//! Standard keyboard layout definitions and analysis button groups

use super::map::{ButtonMap, ConflictPolicy, LayoutError};
use serde::{Deserialize, Serialize};

/// Physical keyboard form factor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum KeyboardKind {
    /// Full-size desktop keyboard with navigation cluster
    #[default]
    External,
    /// Compact laptop keyboard
    Builtin,
}

/// Symbol set of the punctuation/number rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Language {
    #[default]
    EnglishUs,
    EnglishUk,
}

/// Options controlling which buttons a standard layout has and which
/// symbols they carry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutOptions {
    pub kind: KeyboardKind,
    /// QWERTY when true, QWERTZ when false (swaps the Y and Z buttons)
    pub qwerty: bool,
    /// Long left Shift when true; a short left Shift adds the extra
    /// `s10` button and moves the backslash pair onto it
    pub shift_l_long: bool,
    /// Tall Enter spanning two rows when true; a wide Enter moves the
    /// `s6` button up one row
    pub enter_tall: bool,
    pub language: Language,
    pub conflict_policy: ConflictPolicy,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            kind: KeyboardKind::External,
            qwerty: true,
            shift_l_long: true,
            enter_tall: true,
            language: Language::EnglishUs,
            conflict_policy: ConflictPolicy::Warn,
        }
    }
}

/// A built standard layout: the symbol map plus its analysis groups
#[derive(Debug, Clone)]
pub struct StandardLayout {
    pub map: ButtonMap,
    pub groups: ButtonGroups,
}

/// Predefined button subsets used to slice timing and transition
/// queries (e.g. compare left-hand against right-hand statistics)
#[derive(Debug, Clone)]
pub struct ButtonGroups {
    pub alphabet: Vec<String>,
    pub numeric: Vec<String>,
    pub punctuation: Vec<String>,
    pub functional: Vec<String>,
    pub extended: Vec<String>,
    pub finger1: Vec<String>,
    pub finger2: Vec<String>,
    pub finger3: Vec<String>,
    pub finger4: Vec<String>,
    pub finger7: Vec<String>,
    pub finger8: Vec<String>,
    pub finger9: Vec<String>,
    pub finger10: Vec<String>,
}

impl ButtonGroups {
    fn new(options: &LayoutOptions) -> Self {
        let mut punctuation = names(&["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7", "s8", "s9"]);
        let mut finger1 = names(&["1", "Tab", "Q", "CapsLck", "A", "Shift_l", "Z"]);
        if !options.shift_l_long {
            punctuation.push("s10".to_string());
            finger1.push("s10".to_string());
        }
        let extended = match options.kind {
            KeyboardKind::External => names(&[
                "PrtSc", "ScrLk", "PauBrk", "Ins", "Home", "PgUp", "Del", "End", "PgDn", "aUp",
                "aLeft", "aDown", "aRight",
            ]),
            KeyboardKind::Builtin => {
                names(&["PrtSc", "Ins", "Del", "aUp", "aLeft", "aDown", "aRight"])
            }
        };
        Self {
            alphabet: names(&[
                "Q", "W", "E", "R", "T", "Y", "U", "I", "O", "P", "A", "S", "D", "F", "G", "H",
                "J", "K", "L", "Z", "X", "C", "V", "B", "N", "M",
            ]),
            numeric: names(&["1", "2", "3", "4", "5", "6", "7", "8", "9", "0"]),
            punctuation,
            functional: names(&[
                "Esc", "Tab", "CapsLck", "Shift_l", "Ctrl_l", "Alt_l", "Space", "BckSpc", "Enter",
                "Shift_r", "Alt_r", "Ctrl_r",
            ]),
            extended,
            finger1,
            finger2: names(&["2", "W", "S", "X"]),
            finger3: names(&["3", "E", "D", "C"]),
            finger4: names(&["4", "5", "R", "T", "F", "G", "V", "B"]),
            finger7: names(&["6", "7", "Y", "U", "H", "J", "N", "M"]),
            finger8: names(&["8", "I", "K", "s7"]),
            finger9: names(&["9", "O", "L", "s8"]),
            finger10: names(&["0", "s0", "s1", "P", "s2", "s3", "s4", "s5", "s6", "s9"]),
        }
    }

    /// Union of the four left-hand finger groups
    pub fn left_hand(&self) -> Vec<String> {
        [&self.finger1, &self.finger2, &self.finger3, &self.finger4]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }

    /// Union of the four right-hand finger groups
    pub fn right_hand(&self) -> Vec<String> {
        [&self.finger7, &self.finger8, &self.finger9, &self.finger10]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

fn names(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

/// Build a standard layout from options.
///
/// Buttons are created row by row in a fixed order, so conflict
/// reports and derived views are reproducible for a given option set.
pub fn standard_layout(options: &LayoutOptions) -> Result<StandardLayout, LayoutError> {
    let mut map = ButtonMap::with_policy(options.conflict_policy);
    match options.kind {
        KeyboardKind::External => build_external(&mut map, options)?,
        KeyboardKind::Builtin => build_builtin(&mut map, options)?,
    }
    Ok(StandardLayout {
        map,
        groups: ButtonGroups::new(options),
    })
}

fn build_external(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    // Function row
    map.create_button("Esc", &["esc"])?;
    function_keys(map)?;
    map.create_button("PrtSc", &["print_screen"])?;
    map.create_button("ScrLk", &["scroll_lock"])?;
    map.create_button("PauBrk", &["pause"])?;

    // Number row
    number_row(map, options)?;
    map.create_button("Ins", &["insert"])?;
    map.create_button("Home", &["home"])?;
    map.create_button("PgUp", &["page_up"])?;

    // Top letter row
    top_letter_row(map, options)?;
    map.create_button("Del", &["delete"])?;
    map.create_button("End", &["end"])?;
    map.create_button("PgDn", &["page_down"])?;

    // Home row
    home_row(map, options)?;

    // Bottom letter row
    bottom_letter_row(map, options)?;
    map.create_button("aUp", &["up"])?;

    // Modifier row
    map.create_button("Ctrl_l", &["ctrl", "ctrl_l"])?;
    map.create_button("Alt_l", &["alt", "alt_l"])?;
    map.create_button("Space", &["space", " "])?;
    map.create_button("Alt_r", &["alt_r", "alt_gr"])?;
    map.create_button("Ctrl_r", &["ctrl_r"])?;
    map.create_button("aLeft", &["left"])?;
    map.create_button("aDown", &["down"])?;
    map.create_button("aRight", &["right"])?;
    Ok(())
}

fn build_builtin(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    // Function row (compact: Insert/Delete live here, no lock keys)
    map.create_button("Esc", &["esc"])?;
    function_keys(map)?;
    map.create_button("PrtSc", &["print_screen"])?;
    map.create_button("Ins", &["insert"])?;
    map.create_button("Del", &["delete"])?;

    // Number row
    number_row(map, options)?;

    // Top letter row
    top_letter_row(map, options)?;

    // Home row
    home_row(map, options)?;

    // Bottom letter row
    bottom_letter_row(map, options)?;

    // Modifier row with the arrow cluster squeezed in
    map.create_button("Ctrl_l", &["ctrl", "ctrl_l"])?;
    map.create_button("Alt_l", &["alt", "alt_l"])?;
    map.create_button("Space", &["space", " "])?;
    map.create_button("Alt_r", &["alt_r", "alt_gr"])?;
    map.create_button("Ctrl_r", &["ctrl_r"])?;
    map.create_button("aLeft", &["left"])?;
    map.create_button("aUp", &["up"])?;
    map.create_button("aDown", &["down"])?;
    map.create_button("aRight", &["right"])?;
    Ok(())
}

fn function_keys(map: &mut ButtonMap) -> Result<(), LayoutError> {
    for (name, symbol) in [
        ("F1", "f1"),
        ("F2", "f2"),
        ("F3", "f3"),
        ("F4", "f4"),
        ("F5", "f5"),
        ("F6", "f6"),
        ("F7", "f7"),
        ("F8", "f8"),
        ("F9", "f9"),
        ("F10", "f10"),
        ("F11", "f11"),
        ("F12", "f12"),
    ] {
        map.create_button(name, &[symbol])?;
    }
    Ok(())
}

fn number_row(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    let us = options.language == Language::EnglishUs;
    let tilde: &[&str] = if us {
        &["`", "~"]
    } else {
        &["`", "¬", "¦", "§", "±"]
    };
    map.create_button("Tilde", tilde)?;
    map.create_button("1", &["1", "!"])?;
    map.create_button("2", if us { &["2", "@"] } else { &["2", "\""] })?;
    map.create_button("3", if us { &["3", "#"] } else { &["3", "£"] })?;
    let four: &[&str] = if us { &["4", "$"] } else { &["4", "$", "€"] };
    map.create_button("4", four)?;
    map.create_button("5", &["5", "%"])?;
    map.create_button("6", &["6", "^"])?;
    map.create_button("7", &["7", "&"])?;
    map.create_button("8", &["8", "*"])?;
    map.create_button("9", &["9", "("])?;
    map.create_button("0", &["0", ")"])?;
    map.create_button("s0", &["-", "_"])?;
    map.create_button("s1", &["=", "+"])?;
    map.create_button("BckSpc", &["backspace"])?;
    Ok(())
}

fn top_letter_row(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    map.create_button("Tab", &["tab"])?;
    for name in ["Q", "W", "E", "R", "T"] {
        letter(map, name)?;
    }
    letter(map, if options.qwerty { "Y" } else { "Z" })?;
    for name in ["U", "I", "O", "P"] {
        letter(map, name)?;
    }
    map.create_button("s2", &["[", "{"])?;
    map.create_button("s3", &["]", "}"])?;
    if options.enter_tall {
        map.create_button("Enter", &["enter"])?;
    } else {
        create_s6(map, options)?;
    }
    Ok(())
}

fn home_row(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    let us = options.language == Language::EnglishUs;
    map.create_button("CapsLck", &["caps_lock"])?;
    for name in ["A", "S", "D", "F", "G", "H", "J", "K", "L"] {
        letter(map, name)?;
    }
    map.create_button("s4", &[";", ":"])?;
    map.create_button("s5", if us { &["'", "\""] } else { &["'", "@"] })?;
    if options.enter_tall {
        create_s6(map, options)?;
    } else {
        map.create_button("Enter", &["enter"])?;
    }
    Ok(())
}

fn bottom_letter_row(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    map.create_button("Shift_l", &["shift", "shift_l"])?;
    if !options.shift_l_long {
        // The short left Shift frees a slot for the extra s10 button,
        // which takes over the backslash pair from s6.
        map.create_button("s10", &["\\", "|"])?;
    }
    letter(map, if options.qwerty { "Z" } else { "Y" })?;
    for name in ["X", "C", "V", "B", "N", "M"] {
        letter(map, name)?;
    }
    map.create_button("s7", &[",", "<"])?;
    map.create_button("s8", &[".", ">"])?;
    map.create_button("s9", &["/", "?"])?;
    map.create_button("Shift_r", &["shift_r"])?;
    Ok(())
}

fn letter(map: &mut ButtonMap, name: &str) -> Result<(), LayoutError> {
    let lower = name.to_lowercase();
    map.create_button(name, &[lower.as_str(), name])
}

fn create_s6(map: &mut ButtonMap, options: &LayoutOptions) -> Result<(), LayoutError> {
    if !options.shift_l_long {
        // s10 carries the backslash pair instead.
        return map.create_button("s6", &[]);
    }
    let symbols: &[&str] = match options.language {
        Language::EnglishUs => &["\\", "|"],
        Language::EnglishUk => &["#", "~", "\\"],
    };
    map.create_button("s6", symbols)
}
