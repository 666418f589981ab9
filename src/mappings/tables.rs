//! Static correspondence table contents.
//!
//! Tables are ordered: lookups walk them top-down and the first match wins.

use super::ForcedOp;

/// CSL text variable -> item fields, in priority order.
///
/// `shortTitle` is read on import but never written on export, which writes
/// `title-short` instead.
pub(crate) const TEXT_MAPPINGS: &[(&str, &[&str])] = &[
    ("abstract", &["abstractNote"]),
    ("archive", &["archive"]),
    ("archive_location", &["archiveLocation"]),
    ("authority", &["authority"]),
    ("call-number", &["callNumber", "applicationNumber"]),
    ("chapter-number", &["session"]),
    ("collection-number", &["seriesNumber"]),
    ("collection-title", &["seriesTitle", "series"]),
    ("container-title", &["publicationTitle", "reporter", "code"]),
    ("container-title-short", &["journalAbbreviation"]),
    ("dimensions", &["artworkSize", "runningTime"]),
    ("DOI", &["DOI"]),
    ("edition", &["edition"]),
    ("event", &["meetingName", "conferenceName"]),
    ("event-place", &["place"]),
    ("genre", &["type", "programmingLanguage"]),
    ("ISBN", &["ISBN"]),
    ("ISSN", &["ISSN"]),
    ("issue", &["issue", "priorityNumbers"]),
    ("jurisdiction", &["jurisdiction"]),
    ("language", &["language"]),
    ("license", &["rights"]),
    ("medium", &["medium", "system"]),
    ("note", &["extra"]),
    ("number", &["number"]),
    ("number-of-pages", &["numPages"]),
    ("number-of-volumes", &["numberOfVolumes"]),
    ("page", &["pages"]),
    ("publisher", &["publisher"]),
    ("publisher-place", &["place"]),
    ("references", &["history", "references"]),
    ("scale", &["scale"]),
    ("section", &["section", "committee"]),
    ("shortTitle", &["shortTitle"]),
    ("source", &["libraryCatalog"]),
    ("status", &["legalStatus"]),
    ("title", &["title"]),
    ("title-short", &["shortTitle"]),
    ("URL", &["url"]),
    ("version", &["versionNumber"]),
    ("volume", &["volume", "codeNumber"]),
];

/// CSL date variable -> item fields.
pub(crate) const DATE_MAPPINGS: &[(&str, &[&str])] = &[
    ("accessed", &["accessDate"]),
    ("issued", &["date"]),
    ("submitted", &["filingDate"]),
];

/// Creator type -> CSL name variable. Several creator types may share a variable.
pub(crate) const NAME_MAPPINGS: &[(&str, &str)] = &[
    ("author", "author"),
    ("cosponsor", "author"),
    ("bookAuthor", "container-author"),
    ("castMember", "performer"),
    ("performer", "performer"),
    ("composer", "composer"),
    ("director", "director"),
    ("editor", "editor"),
    ("seriesEditor", "collection-editor"),
    ("interviewer", "interviewer"),
    ("producer", "producer"),
    ("recipient", "recipient"),
    ("reviewedAuthor", "reviewed-author"),
    ("scriptwriter", "script-writer"),
    ("guest", "guest"),
    ("translator", "translator"),
];

/// CSL type -> item types. The first item type is the default on import.
pub(crate) const TYPE_MAPPINGS: &[(&str, &[&str])] = &[
    ("article", &["document", "note", "attachment"]),
    ("article-journal", &["journalArticle"]),
    ("article-magazine", &["magazineArticle"]),
    ("article-newspaper", &["newspaperArticle"]),
    ("bill", &["bill", "hearing"]),
    ("book", &["book", "computerProgram"]),
    ("broadcast", &["tvBroadcast", "radioBroadcast", "podcast"]),
    ("chapter", &["bookSection"]),
    ("entry-dictionary", &["dictionaryEntry"]),
    ("entry-encyclopedia", &["encyclopediaArticle"]),
    ("graphic", &["artwork"]),
    ("interview", &["interview"]),
    ("legal_case", &["case"]),
    ("legislation", &["statute"]),
    ("manuscript", &["manuscript"]),
    ("map", &["map"]),
    ("motion_picture", &["film", "videoRecording"]),
    ("paper-conference", &["conferencePaper"]),
    ("patent", &["patent"]),
    ("periodical", &["periodical"]),
    (
        "personal_communication",
        &["letter", "email", "instantMessage"],
    ),
    ("post", &["forumPost"]),
    ("post-weblog", &["blogPost"]),
    ("report", &["report"]),
    ("song", &["audioRecording"]),
    ("speech", &["presentation"]),
    ("thesis", &["thesis"]),
    ("webpage", &["webpage"]),
];

/// Overrides applied after generic export, per item type, in order.
pub(crate) const FORCED_OPS: &[(&str, &[ForcedOp])] = &[
    (
        "email",
        &[ForcedOp::Set {
            variable: "genre",
            value: "email",
        }],
    ),
    (
        "instantMessage",
        &[ForcedOp::Set {
            variable: "genre",
            value: "instant message",
        }],
    ),
    (
        "tvBroadcast",
        &[ForcedOp::Set {
            variable: "genre",
            value: "television broadcast",
        }],
    ),
    (
        "radioBroadcast",
        &[ForcedOp::Set {
            variable: "genre",
            value: "radio broadcast",
        }],
    ),
    (
        "podcast",
        &[ForcedOp::Set {
            variable: "genre",
            value: "podcast",
        }],
    ),
    (
        "periodical",
        &[ForcedOp::Rename {
            from: "title",
            to: "container-title",
        }],
    ),
];
