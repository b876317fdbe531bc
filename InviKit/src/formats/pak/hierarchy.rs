//! Parent/child structure of a decoded skeleton

use std::fmt::Write as _;

use super::skeleton::{BoneNode, ParentRef};

/// Bones grouped by parent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hierarchy {
    /// `children[i]` lists the bones whose parent is bone `i`, in table order
    pub children: Vec<Vec<usize>>,
    pub roots: Vec<usize>,
    /// Bones with a dangling or self parent link, or sitting on a parent cycle
    pub invalid: Vec<usize>,
}

impl Hierarchy {
    #[must_use]
    pub fn build(bones: &[BoneNode]) -> Self {
        let mut children: Vec<Vec<usize>> = vec![Vec::new(); bones.len()];
        let mut roots = Vec::new();
        let mut invalid = Vec::new();

        for (i, bone) in bones.iter().enumerate() {
            match bone.parent {
                ParentRef::Root => roots.push(i),
                ParentRef::Bone(parent) if parent == i || parent >= bones.len() => invalid.push(i),
                ParentRef::Bone(_) if on_cycle(bones, i) => invalid.push(i),
                ParentRef::Bone(parent) => children[parent].push(i),
                ParentRef::OutOfRange { .. } | ParentRef::Unreadable { .. } => invalid.push(i),
            }
        }

        Self {
            children,
            roots,
            invalid,
        }
    }

    #[must_use]
    pub fn children_of(&self, index: usize) -> &[usize] {
        self.children.get(index).map_or(&[], Vec::as_slice)
    }

    /// Render the hierarchy as an indented tree, with broken links listed after it.
    #[must_use]
    pub fn render_tree(&self, bones: &[BoneNode]) -> String {
        let mut out = String::new();
        for &root in &self.roots {
            let _ = writeln!(out, "{}", bones[root].name);
            self.render_children(bones, root, "", &mut out);
        }

        if !self.invalid.is_empty() {
            out.push_str("\n[Invalid Node]\n");
            for &index in &self.invalid {
                let bone = &bones[index];
                let _ = writeln!(
                    out,
                    "└── {} (Invalid parent: {})",
                    bone.name,
                    describe_parent(bone.parent)
                );
                self.render_children(bones, index, "    ", &mut out);
            }
        }
        out
    }

    fn render_children(&self, bones: &[BoneNode], index: usize, prefix: &str, out: &mut String) {
        let children = self.children_of(index);
        for (position, &child) in children.iter().enumerate() {
            let is_last = position + 1 == children.len();
            let connector = if is_last { "└── " } else { "├── " };
            let _ = writeln!(out, "{prefix}{connector}{}", bones[child].name);

            let next_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
            self.render_children(bones, child, &next_prefix, out);
        }
    }
}

/// Whether following parent links from `start` leads back to `start`.
fn on_cycle(bones: &[BoneNode], start: usize) -> bool {
    let mut current = start;
    for _ in 0..bones.len() {
        match bones[current].parent {
            ParentRef::Bone(parent) if parent < bones.len() => {
                if parent == start {
                    return true;
                }
                current = parent;
            }
            _ => return false,
        }
    }
    false
}

fn describe_parent(parent: ParentRef) -> String {
    match parent {
        ParentRef::Root => "none".to_string(),
        ParentRef::Bone(index) => index.to_string(),
        ParentRef::OutOfRange { id } => id.to_string(),
        ParentRef::Unreadable { offset } => format!("unreadable record at +0x{offset:X}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::pak::skeleton::BoneMatrix;

    fn bone(index: usize, name: &str, parent: ParentRef) -> BoneNode {
        BoneNode {
            index,
            id: index as u32,
            name: name.to_string(),
            parent,
            matrix: BoneMatrix { rows: [[0.0; 4]; 4] },
            scale: [1.0; 3],
            local: [0.0; 3],
            translation: [0.0; 3],
        }
    }

    #[test]
    fn test_build_and_render() {
        let bones = vec![
            bone(0, "root", ParentRef::Root),
            bone(1, "spine", ParentRef::Bone(0)),
            bone(2, "arm_l", ParentRef::Bone(1)),
            bone(3, "arm_r", ParentRef::Bone(1)),
            bone(4, "tail", ParentRef::Bone(0)),
        ];
        let hierarchy = Hierarchy::build(&bones);
        assert_eq!(hierarchy.roots, vec![0]);
        assert_eq!(hierarchy.children_of(1), &[2, 3]);
        assert!(hierarchy.invalid.is_empty());

        let expected = "\
root
├── spine
│   ├── arm_l
│   └── arm_r
└── tail
";
        assert_eq!(hierarchy.render_tree(&bones), expected);
    }

    #[test]
    fn test_out_of_range_parent_is_invalid() {
        let bones = vec![
            bone(0, "root", ParentRef::Root),
            bone(1, "stray", ParentRef::OutOfRange { id: 9 }),
        ];
        let hierarchy = Hierarchy::build(&bones);
        assert_eq!(hierarchy.roots, vec![0]);
        assert_eq!(hierarchy.invalid, vec![1]);
        assert!(hierarchy
            .render_tree(&bones)
            .ends_with("[Invalid Node]\n└── stray (Invalid parent: 9)\n"));
    }

    #[test]
    fn test_self_and_cyclic_parents_are_invalid() {
        let bones = vec![
            bone(0, "loop_self", ParentRef::Bone(0)),
            bone(1, "a", ParentRef::Bone(2)),
            bone(2, "b", ParentRef::Bone(1)),
            bone(3, "hangs_off_cycle", ParentRef::Bone(2)),
        ];
        let hierarchy = Hierarchy::build(&bones);
        assert!(hierarchy.roots.is_empty());
        assert_eq!(hierarchy.invalid, vec![0, 1, 2]);
        assert_eq!(hierarchy.children_of(2), &[3]);
    }
}
