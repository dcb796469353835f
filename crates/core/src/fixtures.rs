//! Deterministic demo catalog used when no catalog file is configured.

use crate::catalog::CatalogPackage;

#[derive(Debug, Clone, Copy)]
struct PackageSeed {
    id: &'static str,
    code: &'static str,
    name: &'static str,
    category: &'static str,
    concerns: &'static [&'static str],
    tier: &'static str,
    price: u64,
}

const PACKAGE_SEEDS: &[PackageSeed] = &[
    PackageSeed {
        id: "pkg_face_basic",
        code: "FACE-LIFT-B",
        name: "Facelift Essentials",
        category: "facial",
        concerns: &["sagging_skin", "jowls"],
        tier: "basic",
        price: 4_200,
    },
    PackageSeed {
        id: "pkg_face_premium",
        code: "FACE-LIFT-P",
        name: "Facelift Signature",
        category: "facial",
        concerns: &["sagging_skin", "jowls", "wrinkles"],
        tier: "premium",
        price: 6_900,
    },
    PackageSeed {
        id: "pkg_face_luxury",
        code: "FACE-LIFT-L",
        name: "Facelift Private Suite",
        category: "facial",
        concerns: &["sagging_skin", "jowls", "wrinkles", "neck_laxity"],
        tier: "luxury",
        price: 11_500,
    },
    PackageSeed {
        id: "pkg_face_ultra",
        code: "FACE-LIFT-U",
        name: "Facelift Concierge",
        category: "facial",
        concerns: &["sagging_skin", "jowls", "wrinkles", "neck_laxity", "volume_loss"],
        tier: "ultra",
        price: 18_000,
    },
    PackageSeed {
        id: "pkg_eyes_basic",
        code: "EYE-BLEPH-B",
        name: "Eyelid Refresh",
        category: "eyes",
        concerns: &["hooded_eyelids", "under_eye_bags"],
        tier: "basic",
        price: 2_300,
    },
    PackageSeed {
        id: "pkg_eyes_premium",
        code: "EYE-BLEPH-P",
        name: "Eyelid Refresh Plus",
        category: "eyes",
        concerns: &["hooded_eyelids", "under_eye_bags", "wrinkles"],
        tier: "premium",
        price: 3_800,
    },
    PackageSeed {
        id: "pkg_body_premium",
        code: "BODY-LIPO-P",
        name: "Body Contour",
        category: "body",
        concerns: &["stubborn_fat", "loose_skin"],
        tier: "premium",
        price: 5_400,
    },
    PackageSeed {
        id: "pkg_body_luxury",
        code: "BODY-LIPO-L",
        name: "Body Contour Retreat",
        category: "body",
        concerns: &["stubborn_fat", "loose_skin", "cellulite"],
        tier: "luxury",
        price: 9_800,
    },
];

pub fn demo_catalog() -> Vec<CatalogPackage> {
    PACKAGE_SEEDS
        .iter()
        .map(|seed| CatalogPackage {
            id: seed.id.to_owned(),
            code: seed.code.to_owned(),
            display_name: seed.name.to_owned(),
            category_id: seed.category.to_owned(),
            concern_tags: seed.concerns.iter().map(|tag| (*tag).to_owned()).collect(),
            price_tier: seed.tier.to_owned(),
            final_price: seed.price,
            is_active: true,
        })
        .collect()
}
