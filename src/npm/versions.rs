//! Replacement version ranges for packages in the React ecosystem.
//!
//! One table keyed by package name, each entry listing the range known to
//! work with a given React major. A package without an entry for the requested
//! target falls back to its React 18 range.

use crate::version::TargetVersion;
use crate::version::TargetVersion::{V17, V18, V19};

type VersionRow = (&'static str, &'static [(TargetVersion, &'static str)]);

static VERSION_MAP: &[VersionRow] = &[
    ("react-router", &[(V17, "^5.3.4"), (V18, "^6.22.0"), (V19, "^7.0.0")]),
    ("react-router-dom", &[(V17, "^5.3.4"), (V18, "^6.22.0"), (V19, "^7.0.0")]),
    ("react-redux", &[(V17, "^7.2.9"), (V18, "^8.1.3"), (V19, "^9.1.2")]),
    ("redux", &[(V17, "^4.2.1"), (V18, "^4.2.1"), (V19, "^5.0.1")]),
    ("@reduxjs/toolkit", &[(V17, "^1.9.7"), (V18, "^1.9.7"), (V19, "^2.2.0")]),
    ("@testing-library/react", &[(V17, "^12.1.5"), (V18, "^14.3.1"), (V19, "^16.0.0")]),
    ("@testing-library/jest-dom", &[(V17, "^5.17.0"), (V18, "^6.4.0"), (V19, "^6.4.0")]),
    ("@testing-library/user-event", &[(V17, "^13.5.0"), (V18, "^14.5.2"), (V19, "^14.5.2")]),
    ("@types/react", &[(V17, "^17.0.80"), (V18, "^18.3.3"), (V19, "^19.0.0")]),
    ("@types/react-dom", &[(V17, "^17.0.25"), (V18, "^18.3.0"), (V19, "^19.0.0")]),
    ("react-test-renderer", &[(V17, "^17.0.2"), (V18, "^18.3.1"), (V19, "^19.0.0")]),
    ("react-scripts", &[(V17, "^4.0.3"), (V18, "^5.0.1"), (V19, "^5.0.1")]),
    ("next", &[(V17, "^12.3.4"), (V18, "^14.2.0"), (V19, "^15.0.0")]),
    ("@emotion/react", &[(V17, "^11.11.4"), (V18, "^11.11.4"), (V19, "^11.13.3")]),
    ("@emotion/styled", &[(V17, "^11.11.5"), (V18, "^11.11.5"), (V19, "^11.13.0")]),
    ("styled-components", &[(V17, "^5.3.11"), (V18, "^6.1.8"), (V19, "^6.1.13")]),
    ("@mui/material", &[(V17, "^5.15.0"), (V18, "^5.15.0"), (V19, "^6.1.0")]),
    ("@mui/icons-material", &[(V17, "^5.15.0"), (V18, "^5.15.0"), (V19, "^6.1.0")]),
    ("@material-ui/core", &[(V18, "^4.12.4")]),
    ("antd", &[(V17, "^4.24.16"), (V18, "^5.16.0"), (V19, "^5.21.0")]),
    ("react-bootstrap", &[(V17, "^1.6.8"), (V18, "^2.10.2"), (V19, "^2.10.5")]),
    ("formik", &[(V18, "^2.4.5")]),
    ("react-hook-form", &[(V17, "^7.51.0"), (V18, "^7.51.0"), (V19, "^7.53.0")]),
    ("react-query", &[(V18, "^3.39.3")]),
    ("@tanstack/react-query", &[(V17, "^4.36.1"), (V18, "^5.28.0"), (V19, "^5.59.0")]),
    ("react-i18next", &[(V17, "^11.18.6"), (V18, "^14.1.0"), (V19, "^15.0.0")]),
    ("react-helmet-async", &[(V17, "^1.3.0"), (V18, "^2.0.4"), (V19, "^2.0.5")]),
    ("framer-motion", &[(V17, "^6.5.1"), (V18, "^11.0.0"), (V19, "^11.11.0")]),
    ("@react-spring/web", &[(V17, "^9.7.3"), (V18, "^9.7.3"), (V19, "^9.7.4")]),
    ("react-select", &[(V17, "^5.8.0"), (V18, "^5.8.0"), (V19, "^5.8.1")]),
    ("react-dnd", &[(V17, "^14.0.5"), (V18, "^16.0.1"), (V19, "^16.0.1")]),
    ("react-beautiful-dnd", &[(V18, "^13.1.1")]),
    ("react-icons", &[(V17, "^4.12.0"), (V18, "^5.0.1"), (V19, "^5.3.0")]),
    ("react-transition-group", &[(V18, "^4.4.5")]),
    ("react-datepicker", &[(V17, "^4.25.0"), (V18, "^6.6.0"), (V19, "^7.4.0")]),
    ("react-toastify", &[(V17, "^8.2.0"), (V18, "^10.0.5"), (V19, "^10.0.6")]),
    ("@tanstack/react-table", &[(V17, "^8.15.0"), (V18, "^8.15.0"), (V19, "^8.20.0")]),
    ("@headlessui/react", &[(V17, "^1.7.18"), (V18, "^1.7.18"), (V19, "^2.1.0")]),
    ("swr", &[(V17, "^1.3.0"), (V18, "^2.2.5"), (V19, "^2.2.5")]),
    ("mobx-react", &[(V17, "^7.6.0"), (V18, "^9.1.0"), (V19, "^9.1.1")]),
    ("zustand", &[(V17, "^4.5.2"), (V18, "^4.5.2"), (V19, "^5.0.0")]),
    ("react-markdown", &[(V17, "^8.0.7"), (V18, "^9.0.1"), (V19, "^9.0.1")]),
    ("@storybook/react", &[(V17, "^6.5.16"), (V18, "^8.0.0"), (V19, "^8.3.0")]),
    ("eslint-plugin-react", &[(V18, "^7.34.0")]),
    ("eslint-plugin-react-hooks", &[(V17, "^4.6.0"), (V18, "^4.6.0"), (V19, "^5.0.0")]),
];

/// Replacement range for `package` at `target`, if the package is known.
pub fn lookup(package: &str, target: TargetVersion) -> Option<&'static str> {
    let (_, ranges) = VERSION_MAP.iter().find(|(name, _)| *name == package)?;
    let pick = |t: TargetVersion| {
        ranges
            .iter()
            .find(|(version, _)| *version == t)
            .map(|(_, range)| *range)
    };
    pick(target).or_else(|| pick(TargetVersion::V18))
}

/// Every package name with a mapping, in table order.
pub fn known_packages() -> impl Iterator<Item = &'static str> {
    VERSION_MAP.iter().map(|(name, _)| *name)
}
