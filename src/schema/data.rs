//! Built-in item type definitions.
//!
//! Each item type lists its type-specific fields, in display order, and its
//! creator types, primary type first. Fields shared by every regular item
//! type are appended from [`COMMON_FIELDS`] unless the type carries its own
//! alias of that field.

use FieldDef::{Plain, Typed};

/// A field slot on an item type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FieldDef {
    /// A field used under its own name.
    Plain(&'static str),
    /// A type-specific alias `(field, base_field)`.
    Typed(&'static str, &'static str),
}

#[derive(Debug)]
pub(crate) struct ItemTypeDef {
    pub name: &'static str,
    pub fields: &'static [FieldDef],
    pub creator_types: &'static [&'static str],
    /// Whether [`COMMON_FIELDS`] apply.
    pub common: bool,
}

pub(crate) const COMMON_FIELDS: &[&str] = &[
    "title",
    "abstractNote",
    "date",
    "shortTitle",
    "language",
    "url",
    "accessDate",
    "archive",
    "archiveLocation",
    "libraryCatalog",
    "callNumber",
    "rights",
    "extra",
];

/// Fields holding dates, by base name.
pub(crate) const DATE_FIELDS: &[&str] = &["date", "accessDate", "filingDate"];

const WRITTEN: &[&str] = &["author", "contributor", "editor", "translator", "seriesEditor"];
const BROADCAST: &[&str] = &[
    "author",
    "castMember",
    "contributor",
    "director",
    "guest",
    "producer",
    "scriptwriter",
];
const CORRESPONDENCE: &[&str] = &["author", "contributor", "recipient"];
const ARTICLE: &[&str] = &["author", "contributor", "translator", "reviewedAuthor"];

pub(crate) const ITEM_TYPES: &[ItemTypeDef] = &[
    ItemTypeDef {
        name: "artwork",
        fields: &[Typed("artworkMedium", "medium"), Plain("artworkSize")],
        creator_types: &["artist", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "audioRecording",
        fields: &[
            Typed("audioRecordingFormat", "medium"),
            Plain("seriesTitle"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("place"),
            Typed("label", "publisher"),
            Plain("runningTime"),
            Plain("ISBN"),
        ],
        creator_types: &["performer", "composer", "contributor", "wordsBy"],
        common: true,
    },
    ItemTypeDef {
        name: "bill",
        fields: &[
            Typed("billNumber", "number"),
            Plain("code"),
            Typed("codeVolume", "volume"),
            Plain("section"),
            Typed("codePages", "pages"),
            Typed("legislativeBody", "authority"),
            Plain("session"),
            Plain("history"),
            Plain("jurisdiction"),
        ],
        creator_types: &["sponsor", "cosponsor", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "blogPost",
        fields: &[
            Typed("blogTitle", "publicationTitle"),
            Typed("websiteType", "type"),
        ],
        creator_types: &["author", "commenter", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "book",
        fields: &[
            Plain("series"),
            Plain("seriesNumber"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("edition"),
            Plain("place"),
            Plain("publisher"),
            Plain("numPages"),
            Plain("ISBN"),
        ],
        creator_types: WRITTEN,
        common: true,
    },
    ItemTypeDef {
        name: "bookSection",
        fields: &[
            Typed("bookTitle", "publicationTitle"),
            Plain("series"),
            Plain("seriesNumber"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("edition"),
            Plain("place"),
            Plain("publisher"),
            Plain("pages"),
            Plain("ISBN"),
        ],
        creator_types: &[
            "author",
            "contributor",
            "editor",
            "bookAuthor",
            "translator",
            "seriesEditor",
        ],
        common: true,
    },
    ItemTypeDef {
        name: "case",
        fields: &[
            Typed("caseName", "title"),
            Plain("reporter"),
            Typed("reporterVolume", "volume"),
            Typed("court", "authority"),
            Typed("docketNumber", "number"),
            Typed("firstPage", "pages"),
            Plain("history"),
            Typed("dateDecided", "date"),
            Plain("jurisdiction"),
        ],
        creator_types: &["author", "counsel", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "computerProgram",
        fields: &[
            Plain("seriesTitle"),
            Plain("versionNumber"),
            Plain("system"),
            Plain("place"),
            Typed("company", "publisher"),
            Plain("programmingLanguage"),
            Plain("ISBN"),
        ],
        creator_types: &["programmer", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "conferencePaper",
        fields: &[
            Typed("proceedingsTitle", "publicationTitle"),
            Plain("conferenceName"),
            Plain("place"),
            Plain("publisher"),
            Plain("volume"),
            Plain("pages"),
            Plain("series"),
            Plain("DOI"),
            Plain("ISBN"),
        ],
        creator_types: WRITTEN,
        common: true,
    },
    ItemTypeDef {
        name: "dictionaryEntry",
        fields: &[
            Typed("dictionaryTitle", "publicationTitle"),
            Plain("series"),
            Plain("seriesNumber"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("edition"),
            Plain("place"),
            Plain("publisher"),
            Plain("pages"),
            Plain("ISBN"),
        ],
        creator_types: WRITTEN,
        common: true,
    },
    ItemTypeDef {
        name: "document",
        fields: &[Plain("publisher")],
        creator_types: &["author", "contributor", "editor", "translator", "reviewedAuthor"],
        common: true,
    },
    ItemTypeDef {
        name: "email",
        fields: &[Typed("subject", "title")],
        creator_types: CORRESPONDENCE,
        common: true,
    },
    ItemTypeDef {
        name: "encyclopediaArticle",
        fields: &[
            Typed("encyclopediaTitle", "publicationTitle"),
            Plain("series"),
            Plain("seriesNumber"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("edition"),
            Plain("place"),
            Plain("publisher"),
            Plain("pages"),
            Plain("ISBN"),
        ],
        creator_types: WRITTEN,
        common: true,
    },
    ItemTypeDef {
        name: "film",
        fields: &[
            Typed("distributor", "publisher"),
            Typed("genre", "type"),
            Typed("videoRecordingFormat", "medium"),
            Plain("runningTime"),
        ],
        creator_types: &["director", "contributor", "scriptwriter", "producer"],
        common: true,
    },
    ItemTypeDef {
        name: "forumPost",
        fields: &[
            Typed("forumTitle", "publicationTitle"),
            Typed("postType", "type"),
        ],
        creator_types: &["author", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "hearing",
        fields: &[
            Plain("committee"),
            Plain("place"),
            Plain("publisher"),
            Plain("numberOfVolumes"),
            Typed("documentNumber", "number"),
            Plain("pages"),
            Typed("legislativeBody", "authority"),
            Plain("session"),
            Plain("history"),
            Plain("jurisdiction"),
        ],
        creator_types: &["contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "instantMessage",
        fields: &[],
        creator_types: CORRESPONDENCE,
        common: true,
    },
    ItemTypeDef {
        name: "interview",
        fields: &[Typed("interviewMedium", "medium")],
        creator_types: &["interviewee", "contributor", "interviewer", "translator"],
        common: true,
    },
    ItemTypeDef {
        name: "journalArticle",
        fields: &[
            Plain("publicationTitle"),
            Plain("volume"),
            Plain("issue"),
            Plain("pages"),
            Plain("series"),
            Plain("seriesTitle"),
            Plain("seriesText"),
            Plain("journalAbbreviation"),
            Plain("DOI"),
            Plain("ISSN"),
            Plain("jurisdiction"),
        ],
        creator_types: &["author", "contributor", "editor", "translator", "reviewedAuthor"],
        common: true,
    },
    ItemTypeDef {
        name: "letter",
        fields: &[Typed("letterType", "type")],
        creator_types: CORRESPONDENCE,
        common: true,
    },
    ItemTypeDef {
        name: "magazineArticle",
        fields: &[
            Plain("publicationTitle"),
            Plain("volume"),
            Plain("issue"),
            Plain("pages"),
            Plain("ISSN"),
        ],
        creator_types: ARTICLE,
        common: true,
    },
    ItemTypeDef {
        name: "manuscript",
        fields: &[
            Typed("manuscriptType", "type"),
            Plain("place"),
            Plain("numPages"),
        ],
        creator_types: &["author", "contributor", "translator"],
        common: true,
    },
    ItemTypeDef {
        name: "map",
        fields: &[
            Typed("mapType", "type"),
            Plain("scale"),
            Plain("seriesTitle"),
            Plain("edition"),
            Plain("place"),
            Plain("publisher"),
            Plain("ISBN"),
        ],
        creator_types: &["cartographer", "contributor", "seriesEditor"],
        common: true,
    },
    ItemTypeDef {
        name: "newspaperArticle",
        fields: &[
            Plain("publicationTitle"),
            Plain("place"),
            Plain("edition"),
            Plain("section"),
            Plain("pages"),
            Plain("ISSN"),
            Plain("jurisdiction"),
        ],
        creator_types: ARTICLE,
        common: true,
    },
    ItemTypeDef {
        name: "note",
        fields: &[],
        creator_types: &[],
        common: false,
    },
    ItemTypeDef {
        name: "attachment",
        fields: &[Plain("title"), Plain("url"), Plain("accessDate")],
        creator_types: &[],
        common: false,
    },
    ItemTypeDef {
        name: "patent",
        fields: &[
            Plain("place"),
            Plain("country"),
            Plain("assignee"),
            Typed("issuingAuthority", "authority"),
            Typed("patentNumber", "number"),
            Plain("filingDate"),
            Plain("pages"),
            Plain("applicationNumber"),
            Plain("priorityNumbers"),
            Typed("issueDate", "date"),
            Plain("references"),
            Plain("legalStatus"),
        ],
        creator_types: &["inventor", "attorneyAgent", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "periodical",
        fields: &[
            Plain("volume"),
            Plain("issue"),
            Plain("place"),
            Plain("publisher"),
            Plain("ISSN"),
        ],
        creator_types: &["editor", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "podcast",
        fields: &[
            Plain("seriesTitle"),
            Typed("episodeNumber", "number"),
            Typed("audioFileType", "medium"),
            Plain("runningTime"),
        ],
        creator_types: &["podcaster", "contributor", "guest"],
        common: true,
    },
    ItemTypeDef {
        name: "presentation",
        fields: &[
            Typed("presentationType", "type"),
            Plain("place"),
            Plain("meetingName"),
        ],
        creator_types: &["presenter", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "radioBroadcast",
        fields: &[
            Typed("programTitle", "publicationTitle"),
            Typed("episodeNumber", "number"),
            Typed("audioRecordingFormat", "medium"),
            Plain("place"),
            Typed("network", "publisher"),
            Plain("runningTime"),
        ],
        creator_types: BROADCAST,
        common: true,
    },
    ItemTypeDef {
        name: "report",
        fields: &[
            Typed("reportNumber", "number"),
            Typed("reportType", "type"),
            Plain("seriesTitle"),
            Plain("place"),
            Typed("institution", "publisher"),
            Plain("pages"),
            Plain("jurisdiction"),
        ],
        creator_types: &["author", "contributor", "translator", "seriesEditor"],
        common: true,
    },
    ItemTypeDef {
        name: "statute",
        fields: &[
            Typed("nameOfAct", "title"),
            Plain("code"),
            Plain("codeNumber"),
            Typed("publicLawNumber", "number"),
            Typed("dateEnacted", "date"),
            Plain("pages"),
            Plain("section"),
            Plain("session"),
            Plain("history"),
            Plain("jurisdiction"),
        ],
        creator_types: &["author", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "thesis",
        fields: &[
            Typed("thesisType", "type"),
            Typed("university", "publisher"),
            Plain("place"),
            Plain("numPages"),
        ],
        creator_types: &["author", "contributor"],
        common: true,
    },
    ItemTypeDef {
        name: "tvBroadcast",
        fields: &[
            Typed("programTitle", "publicationTitle"),
            Typed("episodeNumber", "number"),
            Typed("videoRecordingFormat", "medium"),
            Plain("place"),
            Typed("network", "publisher"),
            Plain("runningTime"),
        ],
        creator_types: BROADCAST,
        common: true,
    },
    ItemTypeDef {
        name: "videoRecording",
        fields: &[
            Typed("videoRecordingFormat", "medium"),
            Plain("seriesTitle"),
            Plain("volume"),
            Plain("numberOfVolumes"),
            Plain("place"),
            Typed("studio", "publisher"),
            Plain("runningTime"),
            Plain("ISBN"),
        ],
        creator_types: &["director", "castMember", "contributor", "producer", "scriptwriter"],
        common: true,
    },
    ItemTypeDef {
        name: "webpage",
        fields: &[
            Typed("websiteTitle", "publicationTitle"),
            Typed("websiteType", "type"),
        ],
        creator_types: &["author", "contributor", "translator"],
        common: true,
    },
];
