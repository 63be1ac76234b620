//! Metadata enumerations (DSS object types, subtypes and search types).
//!
//! Values mirror the numeric codes used by the server. Every enumeration can
//! be looked up by value or by its short name, case-insensitively, with or
//! without the server's constant prefix (`"Attribute"`, `"ATTRIBUTE"` and
//! `"DssTypeAttribute"` all resolve to [`ObjectType::Attribute`]).

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Common behavior of the server's numeric enumerations.
pub trait DssEnum: Sized + Copy + 'static {
    /// Prefix of the server-side constant names, e.g. `DSSTYPE`.
    const PREFIX: &'static str;

    /// Every variant, in declaration order.
    fn all() -> &'static [Self];

    /// The numeric code sent over the wire.
    fn value(self) -> i32;

    /// The short variant name, e.g. `ReportDefinition`.
    fn name(self) -> &'static str;

    /// Looks a variant up by its numeric code.
    fn from_value(value: i32) -> Option<Self> {
        Self::all().iter().copied().find(|v| v.value() == value)
    }

    /// Looks a variant up by name, ignoring case and the optional prefix.
    fn from_name(name: &str) -> Option<Self> {
        let upper = name.trim().to_ascii_uppercase();
        let short = upper.strip_prefix(Self::PREFIX).unwrap_or(upper.as_str());
        Self::all()
            .iter()
            .copied()
            .find(|v| v.name().eq_ignore_ascii_case(short))
    }

    /// Decodes a JSON number or name; anything else is `None`.
    fn from_json(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n
                .as_i64()
                .and_then(|n| i32::try_from(n).ok())
                .and_then(Self::from_value),
            Value::String(s) => Self::from_name(s),
            _ => None,
        }
    }
}

/// Deserializes an optional enumeration, mapping unknown values to `None`.
pub(crate) fn deserialize_lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DssEnum,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(T::from_json))
}

macro_rules! dss_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident : $prefix:literal {
            $( $variant:ident = $value:expr, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(i32)]
        pub enum $name {
            $( $variant = $value, )+
        }

        impl DssEnum for $name {
            const PREFIX: &'static str = $prefix;

            fn all() -> &'static [Self] {
                &[ $( $name::$variant, )+ ]
            }

            fn value(self) -> i32 {
                self as i32
            }

            fn name(self) -> &'static str {
                match self {
                    $( $name::$variant => stringify!($variant), )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}: {} ({:#x})", self.name(), self.value(), self.value())
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_i32(self.value())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let value = Value::deserialize(deserializer)?;
                Self::from_json(&value).ok_or_else(|| {
                    serde::de::Error::custom(format!(
                        "unknown {} value: {}",
                        stringify!($name),
                        value
                    ))
                })
            }
        }
    };
}

dss_enum! {
    /// Search pattern used by `searches/results`.
    pub enum SearchType: "DSSXMLSEARCHTYPE" {
        NotUsed = -1,
        ContainsAnyWord = 0,
        BeginWith = 1,
        Exactly = 2,
        BeginWithPhrase = 3,
        Contains = 4,
        EndWith = 5,
    }
}

impl Default for SearchType {
    fn default() -> Self {
        SearchType::Contains
    }
}

dss_enum! {
    /// Metadata object type.
    pub enum ObjectType: "DSSTYPE" {
        Unknown = -1,
        Reserved = 0,
        Filter = 1,
        Template = 2,
        ReportDefinition = 3,
        Metric = 4,
        Style = 6,
        AggMetric = 7,
        Folder = 8,
        Device = 9,
        Prompt = 10,
        Function = 11,
        Attribute = 12,
        Fact = 13,
        Dimension = 14,
        Table = 15,
        DatamartReport = 16,
        FactGroup = 17,
        Shortcut = 18,
        Resolution = 19,
        Monitor = 20,
        AttributeForm = 21,
        Schema = 22,
        Format = 23,
        Catalog = 24,
        CatalogDefn = 25,
        Column = 26,
        PropertyGroup = 27,
        PropertySet = 28,
        DbRole = 29,
        DbLogin = 30,
        DbConnection = 31,
        Project = 32,
        ServerDef = 33,
        User = 34,
        Transmitter = 35,
        Configuration = 36,
        Request = 37,
        Script = 38,
        Search = 39,
        SearchFolder = 40,
        Datamart = 41,
        FunctionPackageDefinition = 42,
        Role = 43,
        SecurityRole = 44,
        Locale = 45,
        Consolidation = 47,
        ConsolidationElement = 48,
        ScheduleEvent = 49,
        ScheduleObject = 50,
        ScheduleTrigger = 51,
        Link = 52,
        DbTable = 53,
        TableSource = 54,
        DocumentDefinition = 55,
        DrillMap = 56,
        Dbms = 57,
        MdSecurityFilter = 58,
        PromptAnswer = 59,
        PromptAnswers = 60,
        GraphStyle = 61,
        ChangeJournalSearch = 62,
        Blob = 63,
        DashboardTemplate = 64,
        Flag = 65,
        ChangeJournal = 66,
        ExternalShortcut = 67,
        ExternalShortcutTarget = 68,
        Reconciliation = 69,
        Layer = 70,
        Palette = 71,
        Thresholds = 72,
        PersonalView = 73,
        FeatureFlag = 74,
        Bookmark = 75,
        ReservedLastOne = 76,
        NcsObjects = 0xFF,
    }
}

dss_enum! {
    /// Metadata object subtype.
    pub enum ObjectSubtype: "DSSSUBTYPE" {
        Unknown = -1,
        Reserved = 0,
        Filter = 0x0100,
        CustomGroup = 0x0101,
        FilterPartition = 0x0102,
        Segment = 0x0103,
        Template = 0x0200,
        ReportGrid = 0x0300,
        ReportGraph = 0x0301,
        ReportEngine = 0x0302,
        ReportText = 0x0303,
        ReportDatamart = 0x0304,
        ReportBase = 0x0305,
        ReportGridAndGraph = 0x0306,
        ReportNonInteractive = 0x0307,
        ReportCube = 0x0308,
        ReportIncrementRefresh = 0x0309,
        ReportTransaction = 0x030A,
        ReportEmmaCube = 0x030B,
        ReportEmmaCubeIrr = 0x030C,
        Metric = 0x0400,
        SubtotalDefinition = 0x0401,
        SystemSubtotal = 0x0402,
        MetricDmx = 0x0403,
        MetricTraining = 0x0404,
        MetricExtreme = 0x0405,
        MetricReferenceLine = 0x0406,
        MetricRelationship = 0x0407,
        Style = 0x0600,
        AggMetric = 0x0700,
        Folder = 0x0800,
        FolderSystem = 0x0801,
        Device = 0x0900,
        Prompt = 0x0A00,
        PromptBoolean = 0x0A01,
        PromptLong = 0x0A02,
        PromptString = 0x0A03,
        PromptDouble = 0x0A04,
        PromptDate = 0x0A05,
        PromptObjects = 0x0A06,
        PromptElements = 0x0A07,
        PromptExpression = 0x0A08,
        PromptExpressionDraft = 0x0A09,
        PromptDimty = 0x0A0A,
        PromptBigDecimal = 0x0A0B,
        Function = 0x0B00,
        FunctionThirdParty = 0x0B01,
        Attribute = 0x0C00,
        AttributeRole = 0x0C01,
        AttributeTransformation = 0x0C02,
        AttributeAbstract = 0x0C03,
        AttributeRecursive = 0x0C04,
        AttributeDerived = 0x0C05,
        Fact = 0x0D00,
        DimensionSystem = 0x0E00,
        DimensionUser = 0x0E01,
        DimensionOrdered = 0x0E02,
        DimensionUserHierarchy = 0x0E03,
        Table = 0x0F00,
        TablePartitionMd = 0x0F01,
        TablePartitionWh = 0x0F02,
        DatamartReport = 0x1000,
        FactGroup = 0x1100,
        Shortcut = 0x1200,
        ShortcutWeakRef = 0x1201,
        Resolution = 0x1300,
        AttributeForm = 0x1500,
        FormSystem = 0x1501,
        FormNormal = 0x1502,
        Schema = 0x1600,
        Format = 0x1700,
        Catalog = 0x1800,
        CatalogDefn = 0x1900,
        Column = 0x1A00,
        ColumnNormal = 0x1A01,
        ColumnCustom = 0x1A02,
        PropertyGroup = 0x1B00,
        PropertySet = 0x1C00,
        DbRole = 0x1D00,
        DbRoleDataImport = 0x1D01,
        DbRoleDataImportPrimary = 0x1D02,
        DbRoleOauth = 0x1D03,
        DbRoleRemoteDataSource = 0x1D04,
        DbRoleUrlAuth = 0x1D05,
        DbRoleGenericDataConnector = 0x1D06,
        DbLogin = 0x1E00,
        DbConnection = 0x1F00,
        Project = 0x2000,
        ServerDef = 0x2100,
        User = 0x2200,
        UserGroup = 0x2201,
        Transmitter = 0x2300,
        Configuration = 0x2400,
        Request = 0x2500,
        Search = 0x2700,
        IndexedSearch = 0x2701,
        RelationshipSearch = 0x2702,
        SearchFolder = 0x2800,
        SearchFolderCrossProject = 0x2801,
        Datamart = 0x2900,
        FunctionPackageDefinition = 0x2A00,
        Role = 0x2B00,
        RoleTransformation = 0x2B01,
        SecurityRole = 0x2C00,
        Locale = 0x2D00,
        Consolidation = 0x2F00,
        ConsolidationDerived = 0x2F01,
        ConsolidationElement = 0x3000,
        ScheduleEvent = 0x3100,
        ScheduleObject = 0x3200,
        ScheduleTrigger = 0x3300,
        Link = 0x3400,
        DbTable = 0x3500,
        DbTablePmt = 0x3501,
        TableSource = 0x3600,
        DocumentDefinition = 0x3700,
        ReportWritingDocument = 0x3701,
        DocumentTheme = 0x3702,
        Dossier = 0x3703,
        DrillMap = 0x3800,
        Dbms = 0x3900,
        MdSecurityFilter = 0x3A00,
        MonitorPerformance = 0x3B00,
        MonitorJobs = 0x3B01,
        MonitorUserConnections = 0x3B02,
        MonitorDbConnections = 0x3B03,
        PromptAnswer = 0x3B80,
        PromptAnswerBoolean = 0x3B81,
        PromptAnswerLong = 0x3B82,
        PromptAnswerString = 0x3B83,
        PromptAnswerDouble = 0x3B84,
        PromptAnswerDate = 0x3B85,
        PromptAnswerObjects = 0x3B86,
        PromptAnswerElements = 0x3B87,
        PromptAnswerExpression = 0x3B88,
        PromptAnswerExpressionDraft = 0x3B89,
        PromptAnswerDimty = 0x3B8A,
        PromptAnswerBigDecimal = 0x3B8B,
        PromptAnswerInt64 = 0x3B8C,
        PromptAnswers = 0x3C00,
        GraphStyle = 0x3D00,
        ChangeJournalSearch = 0x3E00,
        BlobUnknown = 0x3F00,
        BlobOther = 0x3F01,
        BlobImage = 0x3F02,
        BlobProjectPackage = 0x3F03,
        BlobExcel = 0x3F04,
        BlobHtmlTemplate = 0x3F05,
        DashboardTemplate = 0x4000,
        Flag = 0x4100,
        ChangeJournal = 0x4200,
        ExternalShortcutUnknown = 0x4300,
        ExternalShortcutUrl = 0x4301,
        ExternalShortcutSnapshot = 0x4302,
        ExternalShortcutTarget = 0x4400,
        Reconciliation = 0x4500,
        PaletteSystem = 0x4600,
        PaletteCustom = 0x4601,
        Thresholds = 0x4800,
        SubscriptionAddress = 0xFF01,
        SubscriptionContact = 0xFF02,
        SubscriptionInstance = 0xFF03,
    }
}

impl ObjectSubtype {
    /// Returns true for the subtype served by the `cubes` endpoints.
    pub fn is_cube(self) -> bool {
        self == ObjectSubtype::ReportCube
    }
}
