//! The built-in fictional catalog. No real patient data.

use chrono::NaiveDate;
use record_core::{
    AnatomicalRegion, Diagnosis, EmergencyContact, Gender, MedicalExam, Patient, Severity,
};

/// `(id, name, sector)` of every selectable region, body-top to body-bottom.
const REGIONS: &[(&str, &str, &str)] = &[
    ("head", "Tête", "Neurologie"),
    ("neck", "Cou", "Neurologie"),
    ("brain", "Cerveau", "Neurologie"),
    ("eyes", "Yeux", "Ophtalmologie"),
    ("ears", "Oreilles", "ORL"),
    ("chest", "Thorax", "Pneumologie"),
    ("lungs", "Poumons", "Pneumologie"),
    ("heart", "Cœur", "Cardiologie"),
    ("ventricle", "Ventricule", "Cardiologie"),
    ("atrium", "Oreillette", "Cardiologie"),
    ("aorta", "Aorte", "Cardiologie"),
    ("abdomen", "Abdomen", "Gastroentérologie"),
    ("liver", "Foie", "Gastroentérologie"),
    ("stomach", "Estomac", "Gastroentérologie"),
    ("intestines", "Intestins", "Gastroentérologie"),
    ("pancreas", "Pancréas", "Gastroentérologie"),
    ("gallbladder", "Vésicule biliaire", "Gastroentérologie"),
    ("kidneys", "Reins", "Néphrologie"),
    ("bladder", "Vessie", "Néphrologie"),
    ("spine", "Colonne vertébrale", "Orthopédie"),
    ("cervical", "Vertèbres cervicales", "Orthopédie"),
    ("thoracic", "Vertèbres thoraciques", "Orthopédie"),
    ("lumbar", "Vertèbres lombaires", "Orthopédie"),
    ("arms", "Bras", "Orthopédie"),
    ("shoulder", "Épaule", "Orthopédie"),
    ("humerus", "Humérus", "Orthopédie"),
    ("radius", "Radius", "Orthopédie"),
    ("ulna", "Ulna", "Orthopédie"),
    ("elbow", "Coude", "Orthopédie"),
    ("hands", "Mains", "Orthopédie"),
    ("wrist", "Poignet", "Orthopédie"),
    ("metacarpals", "Métacarpes", "Orthopédie"),
    ("phalanges-hand", "Phalanges main", "Orthopédie"),
    ("legs", "Jambes", "Orthopédie"),
    ("hip", "Hanche", "Orthopédie"),
    ("femur", "Fémur", "Orthopédie"),
    ("knee", "Genou", "Orthopédie"),
    ("tibia", "Tibia", "Orthopédie"),
    ("fibula", "Péroné", "Orthopédie"),
    ("ankle", "Cheville", "Orthopédie"),
    ("feet", "Pieds", "Orthopédie"),
    ("metatarsals", "Métatarses", "Orthopédie"),
    ("phalanges-foot", "Phalanges pied", "Orthopédie"),
];

struct ExamSeed {
    id: &'static str,
    title: &'static str,
    date: (i32, u32, u32),
    region: &'static str,
    sector: &'static str,
    diagnosis: Diagnosis,
    severity: Severity,
    summary: &'static str,
    report: &'static str,
    doctor: Option<&'static str>,
    tags: &'static [&'static str],
}

struct PatientSeed {
    id: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    gender: Gender,
    birth_date: (i32, u32, u32),
    blood_type: &'static str,
    height: u32,
    weight: f64,
    allergies: &'static [&'static str],
    treatments: &'static [&'static str],
    contact: (&'static str, &'static str, &'static str),
    exams: &'static [ExamSeed],
}

const DAMIEN_EXAMS: &[ExamSeed] = &[
    ExamSeed {
        id: "001-01",
        title: "Radiographie Thoracique",
        date: (2025, 3, 12),
        region: "Poumons",
        sector: "Pneumologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Fonction pulmonaire normale",
        report: "Radiographie du thorax de face et de profil. Champs pulmonaires clairs, sans infiltrat ni condensation. Silhouette cardiaque de taille normale. Coupoles diaphragmatiques libres. Conclusion: radiographie thoracique normale.",
        doctor: Some("Martin"),
        tags: &["thorax", "poumons", "normal", "radiographie"],
    },
    ExamSeed {
        id: "001-02",
        title: "Électrocardiogramme",
        date: (2025, 3, 12),
        region: "Cœur",
        sector: "Cardiologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Rythme cardiaque normal",
        report: "ECG 12 dérivations au repos. Rythme sinusal régulier à 68 bpm. Axe électrique normal. Pas de trouble de la conduction ni de signe d'ischémie. Intervalle QT normal. Conclusion: ECG normal.",
        doctor: Some("Dubois"),
        tags: &["cœur", "ECG", "normal", "cardiologie"],
    },
    ExamSeed {
        id: "001-03",
        title: "IRM Cérébrale",
        date: (2024, 11, 5),
        region: "Cerveau",
        sector: "Neurologie",
        diagnosis: Diagnosis::Positive,
        severity: Severity::Low,
        summary: "Migraine chronique confirmée",
        report: "IRM cérébrale avec injection de gadolinium dans le cadre de céphalées chroniques. Signal normal de la substance blanche et grise. Pas de lésion focale. Aspect compatible avec une migraine chronique. Suivi neurologique recommandé.",
        doctor: Some("Lebreton"),
        tags: &["cerveau", "migraine", "IRM", "neurologie"],
    },
    ExamSeed {
        id: "001-04",
        title: "Échographie Abdominale",
        date: (2024, 1, 9),
        region: "Foie",
        sector: "Gastroentérologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Fonction hépatique normale",
        report: "Échographie abdominale complète réalisée à jeun. Foie d'échostructure homogène, de taille normale. Vésicule biliaire alithiasique. Voies biliaires non dilatées. Rate et pancréas d'aspect normal.",
        doctor: Some("Rousseau"),
        tags: &["abdomen", "foie", "normal", "échographie"],
    },
    ExamSeed {
        id: "001-05",
        title: "Radiographie Genou Droit",
        date: (2024, 6, 18),
        region: "Genou",
        sector: "Orthopédie",
        diagnosis: Diagnosis::Positive,
        severity: Severity::Low,
        summary: "Arthrose débutante",
        report: "Radiographie du genou droit de face et de profil. Pincement articulaire débutant du compartiment fémoro-tibial interne. Petits ostéophytes marginaux. Aspect compatible avec une arthrose débutante. Kinésithérapie recommandée.",
        doctor: Some("Moreau"),
        tags: &["genou", "arthrose", "radiographie", "orthopédie"],
    },
    ExamSeed {
        id: "001-06",
        title: "Bilan Sanguin Complet",
        date: (2025, 3, 12),
        region: "Reins",
        sector: "Néphrologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Fonction rénale normale",
        report: "Bilan biologique de suivi préventif. Créatinine sérique 0.9 mg/dL. Urée 28 mg/dL. Clairance estimée 92 mL/min. Protéinurie et hématurie négatives. Fonction rénale dans les limites de la normale.",
        doctor: Some("Bernard"),
        tags: &["sang", "reins", "normal", "biologie"],
    },
    ExamSeed {
        id: "001-07",
        title: "Fond d'œil",
        date: (2023, 9, 27),
        region: "Yeux",
        sector: "Ophtalmologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Rétine normale",
        report: "Examen du fond d'œil après dilatation pupillaire. Papilles optiques de contours normaux. Vaisseaux rétiniens réguliers. Macula d'aspect normal. Pas de signe de rétinopathie.",
        doctor: Some("Lambert"),
        tags: &["yeux", "rétine", "normal", "ophtalmologie"],
    },
    ExamSeed {
        id: "001-08",
        title: "Audiométrie",
        date: (2023, 2, 14),
        region: "Oreilles",
        sector: "ORL",
        diagnosis: Diagnosis::Positive,
        severity: Severity::Low,
        summary: "Perte auditive légère",
        report: "Audiométrie tonale et vocale bilatérale. Seuils à 25 dB à droite et 30 dB à gauche. Perte auditive de transmission légère. Tympanométrie normale. Nettoyage auriculaire et réévaluation recommandés.",
        doctor: Some("Garnier"),
        tags: &["oreilles", "audition", "ORL"],
    },
    ExamSeed {
        id: "001-09",
        title: "Radiographie Colonne Lombaire",
        date: (2022, 10, 3),
        region: "Colonne vertébrale",
        sector: "Orthopédie",
        diagnosis: Diagnosis::Positive,
        severity: Severity::Low,
        summary: "Discopathie L4-L5",
        report: "Radiographie de la colonne lombaire de face et de profil. Pincement discal modéré L4-L5. Ostéophytose marginale débutante. Pas de spondylolisthésis. Renforcement musculaire recommandé.",
        doctor: Some("Moreau"),
        tags: &["colonne", "lombaire", "discopathie", "orthopédie"],
    },
    ExamSeed {
        id: "001-10",
        title: "Scanner Abdominal",
        date: (2022, 5, 30),
        region: "Abdomen",
        sector: "Gastroentérologie",
        diagnosis: Diagnosis::Pending,
        severity: Severity::High,
        summary: "Masse abdominale à explorer",
        report: "Scanner abdomino-pelvien avec injection pour douleurs abdominales persistantes. Formation tissulaire de 3 cm du segment VII hépatique, de densité hétérogène. IRM hépatique et marqueurs tumoraux nécessaires. Surveillance rapprochée.",
        doctor: None,
        tags: &["abdomen", "masse", "scanner", "hépatique"],
    },
];

const MARIE_EXAMS: &[ExamSeed] = &[
    ExamSeed {
        id: "002-01",
        title: "IRM Genou Gauche",
        date: (2024, 1, 8),
        region: "Genou",
        sector: "Orthopédie",
        diagnosis: Diagnosis::Positive,
        severity: Severity::High,
        summary: "Rupture ménisque interne",
        report: "IRM du genou gauche pour douleurs post-traumatiques. Rupture complexe du ménisque interne avec fragment déplacé. Ligaments croisés intacts. Indication de méniscectomie partielle sous arthroscopie.",
        doctor: Some("Moreau"),
        tags: &["genou", "ménisque", "IRM", "chirurgie"],
    },
    ExamSeed {
        id: "002-02",
        title: "Échographie Cardiaque",
        date: (2023, 3, 14),
        region: "Cœur",
        sector: "Cardiologie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Fonction cardiaque préservée",
        report: "Échocardiographie transthoracique complète. Ventricule gauche de taille normale, FEVG 65%. Valves mitrale et aortique normales. Pas d'épanchement péricardique.",
        doctor: Some("Dubois"),
        tags: &["cœur", "échographie", "cardiologie"],
    },
    ExamSeed {
        id: "002-03",
        title: "Radiographie Poignet",
        date: (2021, 11, 2),
        region: "Poignet",
        sector: "Orthopédie",
        diagnosis: Diagnosis::Negative,
        severity: Severity::Low,
        summary: "Pas de fracture",
        report: "Radiographie du poignet droit de face et de profil après chute. Pas de trait de fracture. Interlignes articulaires respectés. Tuméfaction des parties molles.",
        doctor: Some("Petit"),
        tags: &["poignet", "traumatisme", "radiographie"],
    },
];

const LUCAS_EXAMS: &[ExamSeed] = &[ExamSeed {
    id: "003-01",
    title: "Échographie Vésicale",
    date: (2024, 9, 17),
    region: "Vessie",
    sector: "Néphrologie",
    diagnosis: Diagnosis::Pending,
    severity: Severity::Low,
    summary: "Résidu post-mictionnel à contrôler",
    report: "Échographie vésicale sus-pubienne. Paroi vésicale fine et régulière. Résidu post-mictionnel estimé à 80 mL. Contrôle à trois mois.",
    doctor: Some("Bernard"),
    tags: &["vessie", "échographie"],
}];

const PATIENTS: &[PatientSeed] = &[
    PatientSeed {
        id: "001",
        first_name: "Damien",
        last_name: "Martin",
        gender: Gender::Male,
        birth_date: (1978, 3, 22),
        blood_type: "O+",
        height: 182,
        weight: 84.0,
        allergies: &["Pénicilline"],
        treatments: &["Ibuprofène 400mg"],
        contact: ("Claire Martin", "Épouse", "+33 6 21 43 65 87"),
        exams: DAMIEN_EXAMS,
    },
    PatientSeed {
        id: "002",
        first_name: "Marie",
        last_name: "Dupont",
        gender: Gender::Female,
        birth_date: (1985, 6, 15),
        blood_type: "A+",
        height: 168,
        weight: 65.0,
        allergies: &["Pénicilline", "Acariens"],
        treatments: &["Paracétamol 500mg", "Vitamine D"],
        contact: ("Jean Dupont", "Époux", "+33 6 12 34 56 78"),
        exams: MARIE_EXAMS,
    },
    PatientSeed {
        id: "003",
        first_name: "Lucas",
        last_name: "Bernard",
        gender: Gender::Male,
        birth_date: (1962, 11, 3),
        blood_type: "B-",
        height: 175,
        weight: 79.5,
        allergies: &[],
        treatments: &["Tamsulosine 0,4mg"],
        contact: ("Hélène Bernard", "Fille", "+33 6 98 76 54 32"),
        exams: LUCAS_EXAMS,
    },
    PatientSeed {
        id: "004",
        first_name: "Sophie",
        last_name: "Leroy",
        gender: Gender::Female,
        birth_date: (1999, 2, 28),
        blood_type: "AB+",
        height: 161,
        weight: 54.0,
        allergies: &["Latex"],
        treatments: &[],
        contact: ("Marc Leroy", "Père", "+33 7 11 22 33 44"),
        exams: &[],
    },
];

pub(crate) fn regions() -> Vec<AnatomicalRegion> {
    REGIONS
        .iter()
        .map(|(id, name, sector)| AnatomicalRegion {
            id: id.to_string(),
            name: name.to_string(),
            sector: sector.to_string(),
            selected: true,
        })
        .collect()
}

pub(crate) fn patients() -> Vec<Patient> {
    PATIENTS.iter().filter_map(build_patient).collect()
}

fn build_patient(seed: &PatientSeed) -> Option<Patient> {
    let Some(birth_date) = seed_date(seed.birth_date) else {
        tracing::warn!(patient = seed.id, "skipping fixture patient with invalid birth date");
        return None;
    };
    let (name, relationship, phone) = seed.contact;

    Some(Patient {
        id: seed.id.to_string(),
        first_name: seed.first_name.to_string(),
        last_name: seed.last_name.to_string(),
        gender: seed.gender,
        birth_date,
        blood_type: seed.blood_type.to_string(),
        height: seed.height,
        weight: seed.weight,
        allergies: owned(seed.allergies),
        current_treatments: owned(seed.treatments),
        emergency_contact: EmergencyContact {
            name: name.to_string(),
            relationship: relationship.to_string(),
            phone: phone.to_string(),
        },
        medical_history: seed.exams.iter().filter_map(build_exam).collect(),
    })
}

fn build_exam(seed: &ExamSeed) -> Option<MedicalExam> {
    let Some(date) = seed_date(seed.date) else {
        tracing::warn!(exam = seed.id, "skipping fixture exam with invalid date");
        return None;
    };

    Some(MedicalExam {
        id: seed.id.to_string(),
        title: seed.title.to_string(),
        date,
        anatomical_region: seed.region.to_string(),
        medical_sector: seed.sector.to_string(),
        diagnosis: seed.diagnosis,
        severity: seed.severity,
        summary: seed.summary.to_string(),
        full_report: seed.report.to_string(),
        doctor: seed.doctor.map(str::to_string),
        tags: owned(seed.tags),
    })
}

fn seed_date((year, month, day): (i32, u32, u32)) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|item| item.to_string()).collect()
}
