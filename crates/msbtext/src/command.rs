//! The command registry: static tables mapping command bytes to semantics.
//!
//! Any byte below the character threshold is a command. The classic
//! (16-bit) releases use a sixteen-entry table; the later (32-bit) releases
//! extend it with three more commands and widen the version-dependent
//! numeric argument of `SetMarginTop`. Both tables are compiled-in domain
//! data, not user configuration.

/// Which player-name field a substitution command emits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameField {
    /// The surname token.
    Surname,
    /// The given-name token.
    GivenName,
}

/// What a command does when the decoder encounters it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandKind {
    /// Renders a fixed textual token and consumes nothing.
    ControlMarker(&'static str),
    /// Consumes exactly `len` raw bytes (never reinterpreted as units) and
    /// renders them through `render`.
    InlineArgument {
        /// Argument arity in bytes.
        len: usize,
        /// Rendering rule; receives exactly `len` bytes.
        render: fn(&[u8]) -> String,
    },
    /// Emits a player-name field; consumes nothing.
    Substitution(NameField),
    /// Opens a ruby annotation span, rendering the given token.
    PairedMarkerStart(&'static str),
    /// Closes a ruby annotation span, rendering the given token.
    PairedMarkerEnd(&'static str),
    /// Ends the segment; anything after it is ignored.
    Terminator,
}

/// One recognized command byte and its semantics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// The command byte value.
    pub code: u8,
    /// Engine-facing command name, used in diagnostics.
    pub name: &'static str,
    /// Dispatch semantics.
    pub kind: CommandKind,
}

const fn spec(code: u8, name: &'static str, kind: CommandKind) -> CommandSpec {
    CommandSpec { code, name, kind }
}

fn render_color(args: &[u8]) -> String {
    format!("<#{:02X}{:02X}{:02X}>", args[0], args[1], args[2])
}

fn render_margin_top(args: &[u8]) -> String {
    format!("<MarginTop:{}>", big_endian_value(args))
}

fn render_margin_left(args: &[u8]) -> String {
    format!("<MarginLeft:{}>", big_endian_value(args))
}

fn big_endian_value(args: &[u8]) -> u32 {
    args.iter().fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

/// The classic command table: the sixteen entries recognized by the 16-bit
/// releases. `SetMarginTop` carries a 1-byte argument in this revision.
const CLASSIC: &[CommandSpec] = &[
    spec(0x00, "LineBreak", CommandKind::ControlMarker("\n")),
    spec(0x01, "CharacterName", CommandKind::ControlMarker("<Name>")),
    spec(0x02, "LineStart", CommandKind::ControlMarker("<Line>")),
    spec(0x03, "LineEnd", CommandKind::ControlMarker("</Line>")),
    spec(
        0x04,
        "SetColor",
        CommandKind::InlineArgument {
            len: 3,
            render: render_color,
        },
    ),
    spec(0x05, "SelectCharacter", CommandKind::ControlMarker("<Select>")),
    spec(0x09, "RubyBase", CommandKind::ControlMarker("<Ruby>")),
    spec(0x0A, "RubyTextStart", CommandKind::PairedMarkerStart("[")),
    spec(0x0B, "RubyTextEnd", CommandKind::PairedMarkerEnd("]")),
    spec(
        0x11,
        "SetMarginTop",
        CommandKind::InlineArgument {
            len: 1,
            render: render_margin_top,
        },
    ),
    spec(
        0x12,
        "SetMarginLeft",
        CommandKind::InlineArgument {
            len: 2,
            render: render_margin_left,
        },
    ),
    spec(0x18, "InputOrSelect", CommandKind::ControlMarker("<Input>")),
    spec(0x19, "AutoForward", CommandKind::ControlMarker("<Auto>")),
    spec(0x20, "PlayerSurname", CommandKind::Substitution(NameField::Surname)),
    spec(
        0x21,
        "PlayerGivenName",
        CommandKind::Substitution(NameField::GivenName),
    ),
    spec(0xFF, "StringEnd", CommandKind::Terminator),
];

/// The extended command table used by the 32-bit releases: everything in
/// the classic table, three additional markers, and a widened 2-byte
/// `SetMarginTop` argument.
const EXTENDED: &[CommandSpec] = &[
    spec(0x00, "LineBreak", CommandKind::ControlMarker("\n")),
    spec(0x01, "CharacterName", CommandKind::ControlMarker("<Name>")),
    spec(0x02, "LineStart", CommandKind::ControlMarker("<Line>")),
    spec(0x03, "LineEnd", CommandKind::ControlMarker("</Line>")),
    spec(
        0x04,
        "SetColor",
        CommandKind::InlineArgument {
            len: 3,
            render: render_color,
        },
    ),
    spec(0x05, "SelectCharacter", CommandKind::ControlMarker("<Select>")),
    spec(0x09, "RubyBase", CommandKind::ControlMarker("<Ruby>")),
    spec(0x0A, "RubyTextStart", CommandKind::PairedMarkerStart("[")),
    spec(0x0B, "RubyTextEnd", CommandKind::PairedMarkerEnd("]")),
    spec(0x0E, "PrintInParallel", CommandKind::ControlMarker("<Parallel>")),
    spec(0x0F, "PrintInCenter", CommandKind::ControlMarker("<Center>")),
    spec(
        0x11,
        "SetMarginTop",
        CommandKind::InlineArgument {
            len: 2,
            render: render_margin_top,
        },
    ),
    spec(
        0x12,
        "SetMarginLeft",
        CommandKind::InlineArgument {
            len: 2,
            render: render_margin_left,
        },
    ),
    spec(0x18, "InputOrSelect", CommandKind::ControlMarker("<Input>")),
    spec(0x19, "AutoForward", CommandKind::ControlMarker("<Auto>")),
    spec(0x20, "PlayerSurname", CommandKind::Substitution(NameField::Surname)),
    spec(
        0x21,
        "PlayerGivenName",
        CommandKind::Substitution(NameField::GivenName),
    ),
    spec(0x35, "SlowText", CommandKind::ControlMarker("<Slow>")),
    spec(0xFF, "StringEnd", CommandKind::Terminator),
];

/// An immutable command lookup table for one format revision.
#[derive(Debug, Clone, Copy)]
pub struct CommandSet {
    entries: &'static [CommandSpec],
}

impl CommandSet {
    /// The sixteen-entry table of the 16-bit releases.
    #[must_use]
    pub const fn classic() -> Self {
        CommandSet { entries: CLASSIC }
    }

    /// The nineteen-entry table of the 32-bit releases.
    #[must_use]
    pub const fn extended() -> Self {
        CommandSet { entries: EXTENDED }
    }

    /// Looks up a command byte. `None` means the byte is an unknown
    /// command, which the decoder reports as a hard error rather than a
    /// skip.
    #[must_use]
    pub fn lookup(&self, code: u8) -> Option<&'static CommandSpec> {
        self.entries.iter().find(|s| s.code == code)
    }

    /// All entries, in code order.
    #[must_use]
    pub fn entries(&self) -> &'static [CommandSpec] {
        self.entries
    }
}

/// The character-encoding revision of a script. Decided once per decode
/// session and never mixed within one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharacterWidth {
    /// 2-byte character units; classic command set.
    Sixteen,
    /// 4-byte character units; extended command set.
    ThirtyTwo,
}

impl CharacterWidth {
    /// Size in bytes of one character unit.
    #[must_use]
    pub fn unit_len(self) -> usize {
        match self {
            CharacterWidth::Sixteen => 2,
            CharacterWidth::ThirtyTwo => 4,
        }
    }

    /// Bias subtracted from a character unit to obtain the glyph index.
    /// The leading byte of any biased value is `>= 0x80` in either width.
    #[must_use]
    pub fn char_base(self) -> u32 {
        match self {
            CharacterWidth::Sixteen => 0x8000,
            CharacterWidth::ThirtyTwo => 0x8000_0000,
        }
    }

    /// The command table active for this revision.
    #[must_use]
    pub fn command_set(self) -> CommandSet {
        match self {
            CharacterWidth::Sixteen => CommandSet::classic(),
            CharacterWidth::ThirtyTwo => CommandSet::extended(),
        }
    }
}
