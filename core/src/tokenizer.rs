use crate::error::StopwordError;
use lazy_static::lazy_static;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

lazy_static! {
    static ref ENGLISH: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","about","above","after","again","against","all","am","an","and","any","are","aren't","as","at",
            "be","because","been","before","being","below","between","both","but","by",
            "can","can't","cannot","could","couldn't",
            "did","didn't","do","does","doesn't","doing","don't","down","during",
            "each","few","for","from","further",
            "had","hadn't","has","hasn't","have","haven't","having","he","he'd","he'll","he's","her","here","here's","hers","herself","him","himself","his","how","how's",
            "i","i'd","i'll","i'm","i've","if","in","into","is","isn't","it","it's","its","itself",
            "let's","me","more","most","mustn't","my","myself",
            "no","nor","not","of","off","on","once","only","or","other","ought","our","ours","ourselves","out","over","own",
            "same","she","she'd","she'll","she's","should","shouldn't","so","some","such",
            "than","that","that's","the","their","theirs","them","themselves","then","there","there's","these","they","they'd","they'll","they're","they've","this","those","through","to","too",
            "under","until","up","very",
            "was","wasn't","we","we'd","we'll","we're","we've","were","weren't","what","what's","when","when's","where","where's","which","while","who","who's","whom","why","why's","with","won't","would","wouldn't",
            "you","you'd","you'll","you're","you've","your","yours","yourself","yourselves"
        ];
        words.iter().copied().collect()
    };
    static ref PORTUGUESE: HashSet<&'static str> = {
        let words: &[&str] = &[
            "a","à","ao","aos","aquela","aquelas","aquele","aqueles","aquilo","as","às","até",
            "com","como","da","das","de","dela","delas","dele","deles","depois","do","dos",
            "e","é","ela","elas","ele","eles","em","entre","era","eram","éramos","essa","essas","esse","esses","esta","está","estamos","estão","estar","estas","estava","estavam","estávamos","este","esteja","estejam","estejamos","estes","esteve","estive","estivemos","estiver","estivera","estiveram","estivéramos","estiverem","estivermos","estivesse","estivessem","estivéssemos","estou","eu",
            "foi","fomos","for","fora","foram","fôramos","forem","formos","fosse","fossem","fôssemos","fui",
            "há","haja","hajam","hajamos","hão","havemos","haver","hei","houve","houvemos","houver","houvera","houverá","houveram","houvéramos","houverão","houverei","houverem","houveremos","houveria","houveriam","houveríamos","houvermos","houvesse","houvessem","houvéssemos",
            "isso","isto","já","lhe","lhes","mais","mas","me","mesmo","meu","meus","minha","minhas","muito",
            "na","não","nas","nem","no","nos","nós","nossa","nossas","nosso","nossos","num","numa",
            "o","os","ou","para","pela","pelas","pelo","pelos","por",
            "qual","quando","que","quem","são","se","seja","sejam","sejamos","sem","ser","será","serão","serei","seremos","seria","seriam","seríamos","seu","seus","só","somos","sou","sua","suas",
            "também","te","tem","temos","tenha","tenham","tenhamos","tenho","terá","terão","terei","teremos","teria","teriam","teríamos","teu","teus","teve","tinha","tinham","tínhamos","tive","tivemos","tiver","tivera","tiveram","tivéramos","tiverem","tivermos","tivesse","tivessem","tivéssemos","tu","tua","tuas",
            "um","uma","você","vocês","vos"
        ];
        words.iter().copied().collect()
    };
}

/// Language of a built-in stop-word list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    English,
    #[default]
    Portuguese,
    /// No stop words at all.
    None,
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "portuguese" | "pt" => Ok(Language::Portuguese),
            "none" | "" => Ok(Language::None),
            other => Err(format!("unsupported stop-word language: {other}")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Language::English => "english",
            Language::Portuguese => "portuguese",
            Language::None => "none",
        };
        f.write_str(name)
    }
}

/// Set of lower-case words excluded from indexing and querying.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StopwordSet {
    words: HashSet<String>,
}

impl StopwordSet {
    pub fn empty() -> Self { Self::default() }

    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::from_words(ENGLISH.iter().copied()),
            Language::Portuguese => Self::from_words(PORTUGUESE.iter().copied()),
            Language::None => Self::empty(),
        }
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words.into_iter().map(|w| w.as_ref().trim().to_lowercase()).filter(|w| !w.is_empty()).collect();
        Self { words }
    }

    /// Read a list with one word per line. Blank lines and `#` comments are skipped.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, StopwordError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| StopwordError::Io { path: path.to_path_buf(), source })?;
        Ok(Self::from_words(raw.lines().filter(|l| !l.trim_start().starts_with('#'))))
    }

    /// A stop-word file, when given, replaces the built-in list for `language`.
    pub fn resolve(language: Language, path: Option<&Path>) -> Result<Self, StopwordError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::for_language(language)),
        }
    }

    pub fn contains(&self, token: &str) -> bool { self.words.contains(token) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}

/// Whitespace tokenizer with lower-casing and stop-word removal.
///
/// Punctuation is left attached to the token: "sat." stays "sat.".
#[derive(Debug, Clone, Default)]
pub struct Tokenizer {
    stopwords: StopwordSet,
}

impl Tokenizer {
    pub fn new(stopwords: StopwordSet) -> Self { Self { stopwords } }

    pub fn for_language(language: Language) -> Self { Self::new(StopwordSet::for_language(language)) }

    pub fn stopwords(&self) -> &StopwordSet { &self.stopwords }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(str::to_lowercase)
            .filter(|token| !self.stopwords.contains(token))
            .collect()
    }
}
