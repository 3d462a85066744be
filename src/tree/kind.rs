//! Node kind vocabulary.
//!
//! Every markup construct the converter recognizes gets a variant; anything
//! else lands in [`Kind::Other`]. The sentinel kinds `TEXT`, `DIRECTIVE`,
//! `PROCINST`, and `ENTITY` never appear as element names in source markup —
//! the parser and loader assign them directly.

macro_rules! kinds {
    ($($variant:ident => $name:literal,)+) => {
        /// The label identifying what markup construct a tree node represents.
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum Kind {
            $($variant,)+
            /// Unrecognized or future markup kind, carried verbatim.
            Other(String),
        }

        impl Kind {
            /// Canonicalize a tag name into a kind.
            pub fn parse(name: &str) -> Kind {
                match name {
                    $($name => Kind::$variant,)+
                    _ => Kind::Other(name.to_string()),
                }
            }

            /// The tag name this kind stands for.
            pub fn name(&self) -> &str {
                match self {
                    $(Kind::$variant => $name,)+
                    Kind::Other(name) => name,
                }
            }
        }
    };
}

kinds! {
    // Sentinels
    Text => "TEXT",
    Directive => "DIRECTIVE",
    ProcessingInstruction => "PROCINST",
    Entity => "ENTITY",

    // Structure
    Chapter => "chapter",
    Section => "section",
    Part => "part",
    Appendix => "appendix",
    Preface => "preface",
    Title => "title",
    Subtitle => "subtitle",
    BridgeHead => "bridgehead",
    Include => "include",
    Fallback => "fallback",
    Abstract => "abstract",
    Example => "example",
    Procedure => "procedure",
    FormalPara => "formalpara",
    Para => "para",
    SimPara => "simpara",
    Phrase => "phrase",
    Quote => "quote",
    Remark => "remark",
    Footnote => "footnote",

    // Admonitions
    Note => "note",
    Warning => "warning",
    Important => "important",

    // Lists
    ItemizedList => "itemizedlist",
    VariableList => "variablelist",
    VarListEntry => "varlistentry",
    SimpleList => "simplelist",
    BiblioList => "bibliolist",
    BiblioEntry => "biblioentry",
    ListItem => "listitem",
    Step => "step",
    Member => "member",
    Term => "term",

    // Tables
    Table => "table",
    TGroup => "tgroup",
    THead => "thead",
    TFoot => "tfoot",
    Row => "row",
    Entry => "entry",

    // Media
    Figure => "figure",
    MediaObject => "mediaobject",
    InlineMediaObject => "inlinemediaobject",
    ImageObject => "imageobject",
    TextObject => "textobject",
    ImageData => "imagedata",

    // Links and indexing
    Ulink => "ulink",
    Xref => "xref",
    Link => "link",
    IndexTerm => "indexterm",
    Primary => "primary",
    Secondary => "secondary",
    Tertiary => "tertiary",
    See => "see",
    SeeAlso => "seealso",
    Keyword => "keyword",
    SubjectTerm => "subjectterm",

    // Literal blocks
    Screen => "screen",
    Synopsis => "synopsis",
    ProgramListing => "programlisting",

    // Metadata and bibliography
    BookInfo => "bookinfo",
    ArticleInfo => "articleinfo",
    ProductName => "productname",
    ProductNumber => "productnumber",
    Edition => "edition",
    PubsNumber => "pubsnumber",
    PubDate => "pubdate",
    BiblioId => "biblioid",
    CiteBiblioId => "citebiblioid",
    Revision => "revision",
    RevNumber => "revnumber",
    RevDescription => "revdescription",

    // People and organizations
    Author => "author",
    Editor => "editor",
    AuthorGroup => "authorgroup",
    CorpAuthor => "corpauthor",
    Contrib => "contrib",
    FirstName => "firstname",
    Surname => "surname",
    Email => "email",
    Affiliation => "affiliation",
    OrgName => "orgname",
    OrgDiv => "orgdiv",
    Date => "date",

    // GUI and keyboard
    GuiButton => "guibutton",
    GuiLabel => "guilabel",
    GuiMenu => "guimenu",
    GuiSubmenu => "guisubmenu",
    GuiMenuItem => "guimenuitem",
    GuiIcon => "guiicon",
    MenuChoice => "menuchoice",
    KeyCap => "keycap",
    KeyCombo => "keycombo",

    // Inline semantics
    Emphasis => "emphasis",
    Superscript => "superscript",
    Literal => "literal",
    WordAsWord => "wordasword",
    Filename => "filename",
    SystemItem => "systemitem",
    Prompt => "prompt",
    ComputerOutput => "computeroutput",
    UserInput => "userinput",
    Parameter => "parameter",
    ErrorType => "errortype",
    VarName => "varname",
    Function => "function",
    MethodName => "methodname",
    ClassName => "classname",
    Property => "property",
    Type => "type",
    Command => "command",
    CommandOption => "option",
    SgmlTag => "sgmltag",
    Code => "code",
    EnVar => "envar",
    Optional => "optional",
    Package => "package",
    Application => "application",
    CiteTitle => "citetitle",
    Citation => "citation",
    FirstTerm => "firstterm",
    Replaceable => "replaceable",
    MathPhrase => "mathphrase",
    LineAnnotation => "lineannotation",
    Trademark => "trademark",
    Acronym => "acronym",
    Abbrev => "abbrev",
    Uri => "uri",
    RefEntryTitle => "refentrytitle",
    ManVolNum => "manvolnum",
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_known_kinds() {
        assert_eq!(Kind::parse("para"), Kind::Para);
        assert_eq!(Kind::parse("programlisting"), Kind::ProgramListing);
        assert_eq!(Kind::parse("TEXT"), Kind::Text);
    }

    #[test]
    fn parse_unknown_round_trips() {
        let k = Kind::parse("glossary");
        assert_eq!(k, Kind::Other("glossary".to_string()));
        assert_eq!(k.name(), "glossary");
    }

    #[test]
    fn name_round_trips() {
        for tag in ["chapter", "varlistentry", "indexterm", "option", "ENTITY"] {
            assert_eq!(Kind::parse(tag).name(), tag);
        }
    }
}
