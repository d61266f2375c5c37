//! Enumerations and nested record types shared by the catalog entities.
//!
//! Every enum here is stored as its integer ordinal. The ordinals are part of
//! the on-disk format and must never be renumbered.

use shelf_core::{FieldDescriptor, FieldValue, Row, Timestamp, TypeDescriptor, Value};

/// A name that does not match any member of an enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind}: {value:?}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

// ── Status ──────────────────────────────────────────────────────────────────

catalog_enum! {
    /// Development status of a game.
    pub enum Status / STATUS (fallback: Some(5)) {
        Normal = 1 => "Normal",
        Completed = 2 => "Completed",
        OnHold = 3 => "OnHold",
        Abandoned = 4 => "Abandoned",
        Unchecked = 5 => "Unchecked",
        Custom = 6 => "Custom",
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Unchecked
    }
}

// ── Game type ───────────────────────────────────────────────────────────────

catalog_enum! {
    /// Engine or content category of a game.
    pub enum GameType / GAME_TYPE (fallback: Some(23)) {
        Adrift = 2 => "ADRIFT",
        Flash = 4 => "Flash",
        Html = 5 => "HTML",
        Java = 6 => "Java",
        Others = 9 => "Others",
        Qsp = 10 => "QSP",
        Rags = 11 => "RAGS",
        RenPy = 14 => "RenPy",
        Rpgm = 13 => "RPGM",
        Tads = 16 => "Tads",
        Unity = 19 => "Unity",
        UnrealEngine = 20 => "Unreal Eng",
        WebGl = 21 => "WebGL",
        WolfRpg = 22 => "Wolf RPG",
        Cg = 30 => "CG",
        Collection = 7 => "Collection",
        Comics = 24 => "Comics",
        Gif = 25 => "GIF",
        Manga = 26 => "Manga",
        Pinup = 27 => "Pinup",
        SiteRip = 28 => "SiteRip",
        Video = 29 => "Video",
        CheatMod = 3 => "Cheat Mod",
        Mod = 8 => "Mod",
        ReadMe = 12 => "READ ME",
        Request = 15 => "Request",
        Tool = 17 => "Tool",
        Tutorial = 18 => "Tutorial",
        Misc = 1 => "Misc",
        Unchecked = 23 => "Unchecked",
    }
}

impl Default for GameType {
    fn default() -> Self {
        Self::Unchecked
    }
}

// ── Timeline event type ─────────────────────────────────────────────────────

catalog_enum! {
    /// What a timeline event records.
    pub enum TimelineEventType / TIMELINE_EVENT_TYPE (fallback: None) {
        GameAdded = 1 => "Added",
        GameLaunched = 2 => "Launched",
        GameFinished = 3 => "Finished",
        GameInstalled = 4 => "Installed",
        ChangedName = 5 => "Changed name",
        ChangedStatus = 6 => "Changed status",
        ChangedVersion = 7 => "Changed version",
        ChangedDeveloper = 8 => "Changed developer",
        ChangedType = 9 => "Changed type",
        TagsAdded = 10 => "Tags added",
        TagsRemoved = 11 => "Tags removed",
        ScoreIncreased = 12 => "Score increased",
        ScoreDecreased = 13 => "Score decreased",
        RecheckExpired = 14 => "Recheck expired",
        RecheckUserReq = 15 => "Recheck requested",
    }
}

impl Default for TimelineEventType {
    fn default() -> Self {
        Self::GameAdded
    }
}

impl TimelineEventType {
    /// Message template; each `{}` takes one event argument in order.
    pub const fn template(self) -> &'static str {
        match self {
            Self::GameAdded => "Added to the library",
            Self::GameLaunched => "Launched {}",
            Self::GameFinished => "Finished {}",
            Self::GameInstalled => "Installed {}",
            Self::ChangedName => "Name changed from \"{}\" to \"{}\"",
            Self::ChangedStatus => "Status changed from \"{}\" to \"{}\"",
            Self::ChangedVersion => "Version changed from \"{}\" to \"{}\"",
            Self::ChangedDeveloper => "Developer changed from \"{}\" to \"{}\"",
            Self::ChangedType => "Type changed from \"{}\" to \"{}\"",
            Self::TagsAdded => "Tags were added: {}",
            Self::TagsRemoved => "Tags were removed: {}",
            Self::ScoreIncreased => "Forum score increased from {} ({}) to {} ({})",
            Self::ScoreDecreased => "Forum score decreased from {} ({}) to {} ({})",
            Self::RecheckExpired => {
                "Forcefully performed a full recheck because game has remained idle for {} day(s)"
            }
            Self::RecheckUserReq => "Forcefully performed a full recheck requested by user",
        }
    }

    pub fn args_min(self) -> usize {
        self.template().matches("{}").count()
    }
}

// ── Filter mode ─────────────────────────────────────────────────────────────

catalog_enum! {
    /// What a saved filter selects on.
    pub enum FilterMode / FILTER_MODE (fallback: None) {
        Choose = 1 => "Choose",
        Archived = 2 => "Archived",
        Custom = 13 => "Custom",
        ExeState = 3 => "Exe State",
        Finished = 6 => "Finished",
        Installed = 4 => "Installed",
        Label = 5 => "Label",
        Rating = 7 => "Rating",
        Score = 8 => "Score",
        Status = 9 => "Status",
        Tag = 10 => "Tag",
        Type = 11 => "Type",
        Updated = 12 => "Updated",
    }
}

impl Default for FilterMode {
    fn default() -> Self {
        Self::Choose
    }
}

// ── Tag ─────────────────────────────────────────────────────────────────────

/// A known forum tag, identified by its ordinal.
///
/// Tags unknown to this build are invalid: they are dropped when a stored tag
/// list is decoded (their names live on in `unknown_tags`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tag(i64);

pub const TAG: shelf_core::EnumSpec = shelf_core::EnumSpec {
    name: "Tag",
    members: TAG_NAMES,
    fallback: None,
};

impl Tag {
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        TAG.contains(ordinal).then_some(Self(ordinal))
    }

    pub fn from_name(name: &str) -> Option<Self> {
        TAG_NAMES
            .iter()
            .find(|(_, n)| n.eq_ignore_ascii_case(name))
            .map(|(o, _)| Self(*o))
    }

    pub fn ordinal(self) -> i64 {
        self.0
    }

    pub fn name(self) -> &'static str {
        TAG.name_of(self.0).unwrap_or("")
    }

    pub fn all() -> impl Iterator<Item = Tag> {
        TAG_NAMES.iter().map(|(o, _)| Self(*o))
    }
}

impl std::fmt::Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FieldValue for Tag {
    fn to_value(&self) -> Value {
        Value::Enum(self.0)
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Enum(o) | Value::Int(o) => Self::from_ordinal(o),
            _ => None,
        }
    }
}

const TAG_NAMES: &[(i64, &str)] = &[
    (1, "2d-game"),
    (2, "2dcg"),
    (3, "3d-game"),
    (4, "3dcg"),
    (5, "adventure"),
    (6, "ahegao"),
    (140, "ai-cg"),
    (7, "anal-sex"),
    (8, "animated"),
    (9, "asset-addon"),
    (10, "asset-ai-shoujo"),
    (11, "asset-animal"),
    (12, "asset-animation"),
    (13, "asset-audio"),
    (14, "asset-bundle"),
    (15, "asset-character"),
    (16, "asset-clothing"),
    (151, "asset-daz-gen1"),
    (141, "asset-daz-gen2"),
    (142, "asset-daz-gen3"),
    (143, "asset-daz-gen8"),
    (144, "asset-daz-gen81"),
    (145, "asset-daz-gen9"),
    (152, "asset-daz-m4"),
    (153, "asset-daz-v4"),
    (17, "asset-environment"),
    (18, "asset-expression"),
    (146, "asset-female"),
    (19, "asset-hair"),
    (20, "asset-hdri"),
    (21, "asset-honey-select"),
    (22, "asset-honey-select2"),
    (23, "asset-koikatu"),
    (24, "asset-light"),
    (147, "asset-male"),
    (25, "asset-morph"),
    (148, "asset-nonbinary"),
    (150, "asset-playhome"),
    (26, "asset-plugin"),
    (27, "asset-pose"),
    (28, "asset-prop"),
    (149, "asset-scene"),
    (29, "asset-script"),
    (30, "asset-shader"),
    (31, "asset-texture"),
    (32, "asset-utility"),
    (33, "asset-vehicle"),
    (34, "bdsm"),
    (35, "bestiality"),
    (36, "big-ass"),
    (37, "big-tits"),
    (38, "blackmail"),
    (39, "bukkake"),
    (40, "censored"),
    (41, "character-creation"),
    (42, "cheating"),
    (43, "combat"),
    (44, "corruption"),
    (45, "cosplay"),
    (46, "creampie"),
    (47, "dating-sim"),
    (48, "dilf"),
    (49, "drugs"),
    (50, "dystopian-setting"),
    (51, "exhibitionism"),
    (52, "fantasy"),
    (54, "female-protagonist"),
    (53, "femaledomination"),
    (55, "footjob"),
    (56, "furry"),
    (57, "futa-trans"),
    (58, "futa-trans-protagonist"),
    (59, "gay"),
    (60, "graphic-violence"),
    (61, "groping"),
    (62, "group-sex"),
    (63, "handjob"),
    (64, "harem"),
    (65, "horror"),
    (66, "humiliation"),
    (67, "humor"),
    (68, "incest"),
    (69, "internal-view"),
    (70, "interracial"),
    (71, "japanese-game"),
    (72, "kinetic-novel"),
    (73, "lactation"),
    (74, "lesbian"),
    (75, "loli"),
    (77, "male-protagonist"),
    (76, "maledomination"),
    (78, "management"),
    (79, "masturbation"),
    (80, "milf"),
    (81, "mind-control"),
    (82, "mobile-game"),
    (83, "monster"),
    (84, "monster-girl"),
    (85, "multiple-endings"),
    (86, "multiple-penetration"),
    (87, "multiple-protagonist"),
    (88, "necrophilia"),
    (89, "no-sexual-content"),
    (90, "ntr"),
    (91, "oral-sex"),
    (92, "paranormal"),
    (93, "parody"),
    (94, "platformer"),
    (95, "point-click"),
    (96, "possession"),
    (97, "pov"),
    (98, "pregnancy"),
    (99, "prostitution"),
    (100, "puzzle"),
    (101, "rape"),
    (102, "real-porn"),
    (103, "religion"),
    (104, "romance"),
    (105, "rpg"),
    (106, "sandbox"),
    (107, "scat"),
    (108, "school-setting"),
    (109, "sci-fi"),
    (110, "sex-toys"),
    (111, "sexual-harassment"),
    (112, "shooter"),
    (113, "shota"),
    (114, "side-scroller"),
    (115, "simulator"),
    (116, "sissification"),
    (117, "slave"),
    (118, "sleep-sex"),
    (119, "spanking"),
    (120, "strategy"),
    (121, "stripping"),
    (122, "superpowers"),
    (123, "swinging"),
    (124, "teasing"),
    (125, "tentacles"),
    (126, "text-based"),
    (127, "titfuck"),
    (128, "trainer"),
    (129, "transformation"),
    (130, "trap"),
    (131, "turn-based-combat"),
    (132, "twins"),
    (133, "urination"),
    (134, "vaginal-sex"),
    (135, "virgin"),
    (136, "virtual-reality"),
    (137, "voiced"),
    (138, "vore"),
    (139, "voyeurism"),
];

// ── Nested records ──────────────────────────────────────────────────────────

const MIRROR_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("label", TypeDescriptor::Text),
    FieldDescriptor::new("url", TypeDescriptor::Text),
];
pub const MIRROR: TypeDescriptor = TypeDescriptor::Record(MIRROR_FIELDS);
const MIRRORS: TypeDescriptor = TypeDescriptor::Sequence(&MIRROR);

const DOWNLOAD_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("name", TypeDescriptor::Text),
    FieldDescriptor::new("mirrors", MIRRORS),
];
pub const DOWNLOAD: TypeDescriptor = TypeDescriptor::Record(DOWNLOAD_FIELDS);

const REVIEW_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::new("user", TypeDescriptor::Text),
    FieldDescriptor::new("score", TypeDescriptor::Int),
    FieldDescriptor::new("message", TypeDescriptor::Text),
    FieldDescriptor::new("likes", TypeDescriptor::Int),
    FieldDescriptor::new("timestamp", TypeDescriptor::Timestamp),
    FieldDescriptor::new("version", TypeDescriptor::Text),
];
pub const REVIEW: TypeDescriptor = TypeDescriptor::Record(REVIEW_FIELDS);

/// One download link of a [`Download`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mirror {
    pub label: String,
    pub url: String,
}

/// A named download with its mirrors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Download {
    pub name: String,
    pub mirrors: Vec<Mirror>,
}

/// A forum review.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Review {
    pub user: String,
    pub score: i64,
    pub message: String,
    pub likes: i64,
    pub timestamp: Timestamp,
    pub version: String,
}

fn record_row(value: Value) -> Option<Row> {
    match value {
        Value::Record(map) => Some(map.into_iter().collect()),
        _ => None,
    }
}

impl FieldValue for Mirror {
    fn to_value(&self) -> Value {
        Value::record([("label", self.label.to_value()), ("url", self.url.to_value())])
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut row = record_row(value)?;
        Some(Self {
            label: row.take("label"),
            url: row.take("url"),
        })
    }
}

impl FieldValue for Download {
    fn to_value(&self) -> Value {
        Value::record([
            ("name", self.name.to_value()),
            ("mirrors", self.mirrors.to_value()),
        ])
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut row = record_row(value)?;
        Some(Self {
            name: row.take("name"),
            mirrors: row.take("mirrors"),
        })
    }
}

impl FieldValue for Review {
    fn to_value(&self) -> Value {
        Value::record([
            ("user", self.user.to_value()),
            ("score", self.score.to_value()),
            ("message", self.message.to_value()),
            ("likes", self.likes.to_value()),
            ("timestamp", self.timestamp.to_value()),
            ("version", self.version.to_value()),
        ])
    }

    fn from_value(value: Value) -> Option<Self> {
        let mut row = record_row(value)?;
        Some(Self {
            user: row.take("user"),
            score: row.take("score"),
            message: row.take("message"),
            likes: row.take("likes"),
            timestamp: row.take("timestamp"),
            version: row.take("version"),
        })
    }
}
