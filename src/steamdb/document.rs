//! Retrieval document construction
//!
//! Turns a catalog record into the text that gets embedded: cleaned
//! description, explicit plus description-derived tags and genres, behind an
//! instruction line telling the embedding model what the text is for.

use crate::steamdb::record::GameRecord;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Instruction line prefixed to every catalog document
pub const DOCUMENT_INSTRUCTION: &str =
    "Represent the meaning of the following video game description for semantic retrieval:";

/// Instruction line prefixed to every user query
pub const QUERY_INSTRUCTION: &str =
    "Represent the user query for retrieving relevant video games. ";

/// Description keyword patterns and the tag each one implies, in priority order
const DESCRIPTION_TAGS: &[(&str, &str)] = &[
    // core genres
    (r"\brpg\b", "RPG"),
    (r"\brole[- ]?playing\b", "RPG"),
    (r"\baction rpg\b", "Action RPG"),
    (r"\bjrpg\b", "JRPG"),
    (r"\bsouls[- ]?like\b", "Souls-like"),
    (r"\bmmo\b", "MMO"),
    (r"\bmmorpg\b", "MMORPG"),
    (r"\barpg\b", "ARPG"),
    (r"\bshooter\b", "Shooter"),
    (r"\bfps\b", "FPS"),
    (r"\bfirst[- ]?person shooter\b", "FPS"),
    (r"\btps\b", "TPS"),
    (r"\bthird[- ]?person shooter\b", "Third-Person Shooter"),
    (r"\btop[- ]?down shooter\b", "Top-Down Shooter"),
    (r"\bstrategy\b", "Strategy"),
    (r"\brts\b", "RTS"),
    (r"\breal[- ]?time strategy\b", "RTS"),
    (r"\bturn[- ]?based\b", "Turn-Based"),
    (r"\btactical\b", "Tactical"),
    (r"\broguelike\b", "Roguelike"),
    (r"\brogue[- ]?lite\b", "Roguelite"),
    (r"\bpermadeath\b", "Permadeath"),
    (r"\bplatformer\b", "Platformer"),
    (r"\bmetroidvania\b", "Metroidvania"),
    (r"\bsurvival\b", "Survival"),
    (r"\bcra(ft|fting)\b", "Crafting"),
    (r"\bbase building\b", "Base Building"),
    (r"\bpuzzle\b", "Puzzle"),
    (r"\bhorror\b", "Horror"),
    (r"\bsurvival horror\b", "Survival Horror"),
    (r"\bsimulation\b", "Simulation"),
    (r"\blife sim\b", "Life Simulation"),
    (r"\bfarming\b", "Farming"),
    (r"\bfarm\b", "Farming"),
    (r"\bmanagement\b", "Management"),
    (r"\bracing\b", "Racing"),
    (r"\bdriving\b", "Driving"),
    (r"\bvehicle combat\b", "Vehicular Combat"),
    // world / setting
    (r"\bfantasy\b", "Fantasy"),
    (r"\bhigh fantasy\b", "High Fantasy"),
    (r"\bdark fantasy\b", "Dark Fantasy"),
    (r"\bmedieval\b", "Medieval"),
    (r"\bknight\b", "Medieval"),
    (r"\bmagic(al)?\b", "Magic"),
    (r"\bspell\b", "Magic"),
    (r"\bsteampunk\b", "Steampunk"),
    (r"\bcyberpunk\b", "Cyberpunk"),
    (r"\bpost[- ]?apocalyptic\b", "Post-Apocalyptic"),
    (r"\bdystopian\b", "Dystopian"),
    (r"\bapocalypse\b", "Post-Apocalyptic"),
    (r"\bscience fiction\b", "Sci-Fi"),
    (r"\bsci[- ]?fi\b", "Sci-Fi"),
    (r"\bspace\b", "Space"),
    (r"\bgalaxy\b", "Space"),
    (r"\binterstellar\b", "Space"),
    (r"\bwestern\b", "Western"),
    (r"\bsamurai\b", "Samurai"),
    (r"\bninja\b", "Ninja"),
    (r"\bmytholog(y|ical)\b", "Mythology"),
    // world type
    (r"\bopen[- ]?world\b", "Open World"),
    (r"\bsandbox\b", "Sandbox"),
    (r"\bnon[- ]?linear\b", "Non-linear"),
    (r"\bhub[- ]?based\b", "Hub World"),
    // story / tone
    (r"\bstory[- ]?driven\b", "Story Rich"),
    (r"\bstory rich\b", "Story Rich"),
    (r"\bnarrative\b", "Narrative"),
    (r"\bchoices matter\b", "Choices Matter"),
    (r"\bbranching\b", "Choices Matter"),
    (r"\bmoral choices?\b", "Moral Choices"),
    (r"\bcharacter driven\b", "Character Driven"),
    (r"\bepic\b", "Epic"),
    (r"\bemotional\b", "Emotional"),
    // characters
    (r"\bcompanions?\b", "Companions"),
    (r"\bfollowers?\b", "Companions"),
    (r"\bfactions?\b", "Factions"),
    // combat
    (r"\bcombat\b", "Combat"),
    (r"\bmelee\b", "Melee Combat"),
    (r"\bsword\b", "Melee Combat"),
    (r"\barchery\b", "Archery"),
    (r"\branged\b", "Ranged Combat"),
    (r"\bgunfight\b", "Gun Combat"),
    (r"\bshootout\b", "Gun Combat"),
    (r"\bboss(es)?\b", "Boss Fights"),
    (r"\bstealth\b", "Stealth"),
    (r"\bcover system\b", "Cover Shooter"),
    (r"\bparkour\b", "Parkour"),
    (r"\bdodging\b", "Dodging"),
    // progression
    (r"\blevel up\b", "Progression"),
    (r"\bleveling\b", "Progression"),
    (r"\bexperience\b", "Progression"),
    (r"\bxp\b", "Progression"),
    (r"\bskills?\b", "Skills"),
    (r"\bskill tree\b", "Skills"),
    (r"\babilities\b", "Abilities"),
    (r"\btraits?\b", "Traits"),
    (r"\bperks?\b", "Perks"),
    (r"\bloot\b", "Loot"),
    (r"\binventory\b", "Inventory"),
    (r"\bresources?\b", "Resource Management"),
    // quests / exploration
    (r"\bquests?\b", "Questing"),
    (r"\bside quests?\b", "Side Quests"),
    (r"\bexplor(ation|e)\b", "Exploration"),
    (r"\bdiscover\b", "Exploration"),
    (r"\bdungeons?\b", "Dungeons"),
    (r"\braids?\b", "Raids"),
    (r"\bcaves?\b", "Caves"),
    (r"\bruins?\b", "Ruins"),
    // activities
    (r"\bhunting\b", "Hunting"),
    (r"\bfishing\b", "Fishing"),
    (r"\bharvesting\b", "Harvesting"),
    (r"\bmining\b", "Mining"),
    (r"\bhorse riding\b", "Horse Riding"),
    (r"\bmount\b", "Mounts"),
    // creatures
    (r"\bmonsters?\b", "Monsters"),
    (r"\bbeasts?\b", "Beasts"),
    (r"\bdemons?\b", "Demons"),
    (r"\bdragons?\b", "Dragons"),
    (r"\bundead\b", "Undead"),
    (r"\bzombies?\b", "Zombies"),
    (r"\baliens?\b", "Aliens"),
    (r"\brobots?\b", "Robots"),
    (r"\bmechs?\b", "Mechs"),
    // multiplayer
    (r"\bco[- ]?op\b", "Co-op"),
    (r"\bmultiplayer\b", "Multiplayer"),
    (r"\bonline\b", "Online"),
    (r"\bpvp\b", "PvP"),
    (r"\bpve\b", "PvE"),
    (r"\bguilds?\b", "Guilds"),
    (r"\bclans?\b", "Clans"),
    // visual style
    (r"\bpixel art\b", "Pixel Art"),
    (r"\banime\b", "Anime"),
    (r"\bcartoon\b", "Cartoon"),
    (r"\bvoxel\b", "Voxel"),
    (r"\b2d\b", "2D"),
    (r"\b3d\b", "3D"),
    (r"\bisometric\b", "Isometric"),
    (r"\btop[- ]?down\b", "Top-Down"),
    // misc
    (r"\brealistic\b", "Realistic"),
    (r"\bphysics\b", "Physics"),
    (r"\bdestruction\b", "Destruction"),
    (r"\bbuilder\b", "Building"),
    (r"\bopen[- ]?ended\b", "Open-Ended"),
];

fn tag_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        DESCRIPTION_TAGS
            .iter()
            .filter_map(|(pattern, tag)| {
                RegexBuilder::new(pattern)
                    .case_insensitive(true)
                    .build()
                    .ok()
                    .map(|re| (re, *tag))
            })
            .collect()
    })
}

fn markup() -> &'static Regex {
    static MARKUP: OnceLock<Regex> = OnceLock::new();
    MARKUP.get_or_init(|| {
        Regex::new(r"(?is)<(script|style)\b.*?</(script|style)\s*>|<!--.*?-->|<[^>]*>")
            .expect("static markup pattern")
    })
}

/// Strip markup, decode entities and collapse whitespace
pub fn clean_description(raw: &str) -> String {
    let without_tags = markup().replace_all(raw, " ");
    let decoded = html_escape::decode_html_entities(&without_tags);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Tags implied by a cleaned description, in table order, without duplicates
pub fn extract_tags(description: &str) -> Vec<&'static str> {
    let mut seen = HashSet::new();
    tag_patterns()
        .iter()
        .filter(|(re, _)| re.is_match(description))
        .map(|(_, tag)| *tag)
        .filter(|tag| seen.insert(*tag))
        .collect()
}

fn split_list(list: &str) -> impl Iterator<Item = &str> {
    list.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Merge explicit and derived tags, first occurrence wins (case-insensitive)
pub fn merge_tags<'a>(
    explicit: impl IntoIterator<Item = &'a str>,
    derived: impl IntoIterator<Item = &'a str>,
) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    explicit
        .into_iter()
        .chain(derived)
        .filter(|tag| seen.insert(tag.to_lowercase()))
        .collect()
}

/// Document text without the instruction line
pub fn document_body(record: &GameRecord) -> String {
    let description = clean_description(&record.description);
    let derived = extract_tags(&description);
    let tags = merge_tags(split_list(&record.tags), derived);
    let genres: Vec<&str> = split_list(&record.genres).collect();

    let mut lines = Vec::with_capacity(3);
    if !record.name.is_empty() {
        lines.push(format!("Game: {}.", record.name));
    }
    if !tags.is_empty() {
        lines.push(format!("Tags: {}.", tags.join(", ")));
    }
    if !genres.is_empty() {
        lines.push(format!("Genres: {}.", genres.join(", ")));
    }
    lines.join("\n")
}

/// Full text embedded for a catalog record
pub fn build_text(record: &GameRecord) -> String {
    format!("{}\n{}", DOCUMENT_INSTRUCTION, document_body(record))
}

/// Full text embedded for a user query
pub fn query_text(query: &str) -> String {
    format!("{}\n{}", QUERY_INSTRUCTION, query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_pattern_compiles() {
        assert_eq!(tag_patterns().len(), DESCRIPTION_TAGS.len());
    }

    #[test]
    fn test_clean_description() {
        let raw = "<h2 class=\"bb_tag\">About</h2><p>Dungeons &amp; Dragons&nbsp;&quot;style&quot;</p>\n\n<br>  loot!";
        assert_eq!(clean_description(raw), "About Dungeons & Dragons \"style\" loot!");
    }

    #[test]
    fn test_clean_description_drops_scripts() {
        assert_eq!(clean_description("a<script>var x = 1;</script>b"), "a b");
    }

    #[test]
    fn test_extract_tags_case_insensitive_and_ordered() {
        let tags = extract_tags("An open-world RPG with Dragons and a skill tree. Co-op raids.");
        assert_eq!(
            tags,
            vec!["RPG", "Open World", "Skills", "Raids", "Dragons", "Co-op"]
        );
    }

    #[test]
    fn test_extract_tags_respects_word_boundaries() {
        assert!(extract_tags("spaceship rpgmaker").is_empty());
    }

    #[test]
    fn test_merge_tags_dedupes_first_seen() {
        let merged = merge_tags(vec!["RPG", "Open World"], vec!["rpg", "Dragons", "Open World"]);
        assert_eq!(merged, vec!["RPG", "Open World", "Dragons"]);
    }

    #[test]
    fn test_build_text_layout() {
        let record = GameRecord {
            name: "Skyrim".to_string(),
            description: "<p>Epic fantasy with dragons.</p>".to_string(),
            tags: "Open World, RPG".to_string(),
            genres: "RPG,Adventure".to_string(),
            popularity: 30_000_000,
        };

        let text = build_text(&record);
        assert_eq!(
            text,
            "Represent the meaning of the following video game description for semantic retrieval:\n\
             Game: Skyrim.\n\
             Tags: Open World, RPG, Fantasy, Epic, Dragons.\n\
             Genres: RPG, Adventure."
        );
    }

    #[test]
    fn test_build_text_omits_empty_sections() {
        let record = GameRecord {
            name: "Untitled".to_string(),
            description: "Nothing notable here".to_string(),
            tags: String::new(),
            genres: String::new(),
            popularity: 40_000,
        };
        assert_eq!(document_body(&record), "Game: Untitled.");
    }

    #[test]
    fn test_query_text_prefix() {
        let text = query_text("cozy farming");
        assert!(text.starts_with(QUERY_INSTRUCTION));
        assert!(text.ends_with("\ncozy farming"));
    }
}
