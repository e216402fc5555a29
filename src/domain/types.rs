// ==========================================
// 互访评估系统 - 领域类型定义
// ==========================================
// 机构目录: 封闭枚举，非法机构在构造时即报错
// 等级: 序列化为远程表格中使用的泰文等级文本
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 成员机构 (Facility)
// ==========================================
// 序列化格式: 泰文机构全称（与远程表格数据一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Facility {
    #[serde(rename = "รพ.ภักดีชุมพล")]
    PakdiChumpol,
    #[serde(rename = "รพ.ซับใหญ่")]
    SapYai,
    #[serde(rename = "รพ.บำเหน็จณรงค์")]
    BamnetNarong,
    #[serde(rename = "รพ.จตุรัส")]
    Chatturat,
    #[serde(rename = "รพ.บ้านเขว้า")]
    BanKhwao,
    #[serde(rename = "เทศบาลเมืองชัยภูมิ")]
    ChaiyaphumMunicipality,
    #[serde(rename = "รพ.เทพสถิต")]
    ThepSathit,
    #[serde(rename = "รพ.แก้งคร้อ")]
    KaengKhro,
    #[serde(rename = "รพ.หนองบัวแดง")]
    NongBuaDaeng,
    #[serde(rename = "รพ.ภูเขียวเฉลิมพระเกียรติ")]
    PhuKhieo,
    #[serde(rename = "รพ.คอนสาร")]
    KhonSan,
    #[serde(rename = "รพ.ชัยภูมิ")]
    Chaiyaphum,
    #[serde(rename = "รพ.หนองบัวระเหว")]
    NongBuaRawe,
    #[serde(rename = "รพ.เนินสง่า")]
    NoenSaNga,
    #[serde(rename = "รพ.บ้านแท่น")]
    BanThaen,
    #[serde(rename = "รพ.คอนสวรรค์")]
    KhonSawan,
    #[serde(rename = "รพ.เกษตรสมบูรณ์")]
    KasetSombun,
    #[serde(rename = "ศูนย์การศึกษาพิเศษ")]
    SpecialEducationCenter,
}

impl Facility {
    /// 全部成员机构（目录顺序）
    pub const ALL: [Facility; 18] = [
        Facility::PakdiChumpol,
        Facility::SapYai,
        Facility::BamnetNarong,
        Facility::Chatturat,
        Facility::BanKhwao,
        Facility::ChaiyaphumMunicipality,
        Facility::ThepSathit,
        Facility::KaengKhro,
        Facility::NongBuaDaeng,
        Facility::PhuKhieo,
        Facility::KhonSan,
        Facility::Chaiyaphum,
        Facility::NongBuaRawe,
        Facility::NoenSaNga,
        Facility::BanThaen,
        Facility::KhonSawan,
        Facility::KasetSombun,
        Facility::SpecialEducationCenter,
    ];

    /// 主办机构（省级医院），不受轮换配额限制
    pub const HOME: Facility = Facility::Chaiyaphum;

    pub fn is_home(self) -> bool {
        self == Self::HOME
    }

    /// ASCII 代码（日志与配置使用）
    pub fn code(self) -> &'static str {
        match self {
            Facility::PakdiChumpol => "PAKDI_CHUMPOL",
            Facility::SapYai => "SAP_YAI",
            Facility::BamnetNarong => "BAMNET_NARONG",
            Facility::Chatturat => "CHATTURAT",
            Facility::BanKhwao => "BAN_KHWAO",
            Facility::ChaiyaphumMunicipality => "CHAIYAPHUM_MUNICIPALITY",
            Facility::ThepSathit => "THEP_SATHIT",
            Facility::KaengKhro => "KAENG_KHRO",
            Facility::NongBuaDaeng => "NONG_BUA_DAENG",
            Facility::PhuKhieo => "PHU_KHIEO",
            Facility::KhonSan => "KHON_SAN",
            Facility::Chaiyaphum => "CHAIYAPHUM",
            Facility::NongBuaRawe => "NONG_BUA_RAWE",
            Facility::NoenSaNga => "NOEN_SA_NGA",
            Facility::BanThaen => "BAN_THAEN",
            Facility::KhonSawan => "KHON_SAWAN",
            Facility::KasetSombun => "KASET_SOMBUN",
            Facility::SpecialEducationCenter => "SPECIAL_EDUCATION_CENTER",
        }
    }

    /// 泰文显示名（即线上存储格式）
    pub fn display_name(self) -> &'static str {
        match self {
            Facility::PakdiChumpol => "รพ.ภักดีชุมพล",
            Facility::SapYai => "รพ.ซับใหญ่",
            Facility::BamnetNarong => "รพ.บำเหน็จณรงค์",
            Facility::Chatturat => "รพ.จตุรัส",
            Facility::BanKhwao => "รพ.บ้านเขว้า",
            Facility::ChaiyaphumMunicipality => "เทศบาลเมืองชัยภูมิ",
            Facility::ThepSathit => "รพ.เทพสถิต",
            Facility::KaengKhro => "รพ.แก้งคร้อ",
            Facility::NongBuaDaeng => "รพ.หนองบัวแดง",
            Facility::PhuKhieo => "รพ.ภูเขียวเฉลิมพระเกียรติ",
            Facility::KhonSan => "รพ.คอนสาร",
            Facility::Chaiyaphum => "รพ.ชัยภูมิ",
            Facility::NongBuaRawe => "รพ.หนองบัวระเหว",
            Facility::NoenSaNga => "รพ.เนินสง่า",
            Facility::BanThaen => "รพ.บ้านแท่น",
            Facility::KhonSawan => "รพ.คอนสวรรค์",
            Facility::KasetSombun => "รพ.เกษตรสมบูรณ์",
            Facility::SpecialEducationCenter => "ศูนย์การศึกษาพิเศษ",
        }
    }
}

impl fmt::Display for Facility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// 未知机构
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("未知机构: {0}")]
pub struct UnknownFacility(pub String);

impl FromStr for Facility {
    type Err = UnknownFacility;

    /// 同时接受泰文显示名与 ASCII 代码
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Facility::ALL
            .iter()
            .copied()
            .find(|f| f.display_name() == trimmed || f.code().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| UnknownFacility(trimmed.to_string()))
    }
}

// ==========================================
// 评估等级 (Grade)
// ==========================================
// 顺序: Fail < Good < VeryGood < Excellent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "ไม่ผ่าน")]
    Fail,
    #[serde(rename = "ดี")]
    Good,
    #[serde(rename = "ดีมาก")]
    VeryGood,
    #[serde(rename = "ดีเยี่ยม")]
    Excellent,
}

impl Grade {
    /// 全部等级（从低到高）
    pub const ALL: [Grade; 4] = [Grade::Fail, Grade::Good, Grade::VeryGood, Grade::Excellent];

    /// 泰文等级文本（即线上存储格式）
    pub fn label(self) -> &'static str {
        match self {
            Grade::Fail => "ไม่ผ่าน",
            Grade::Good => "ดี",
            Grade::VeryGood => "ดีมาก",
            Grade::Excellent => "ดีเยี่ยม",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grade::Fail => write!(f, "FAIL"),
            Grade::Good => write!(f, "GOOD"),
            Grade::VeryGood => write!(f, "VERY_GOOD"),
            Grade::Excellent => write!(f, "EXCELLENT"),
        }
    }
}
