//! Document shown when no file is given.

pub const SAMPLE: &str = r#"# Welcome to tinct: every category below has its own color.
import math

GREETING = 'hello'
BANNER = """
multi-line strings
stay one span
"""


class Circle:
    def __init__(self, radius=1.0):
        self.radius = radius
        self.tags = []

    def area(self):
        return math.pi * self.radius ** 2


def describe(shapes):
    if not shapes or len(shapes) == 0:
        return None
    total = sum(s.area() for s in shapes)
    z = 3 + 4j
    flags = {True: "round", False: "flat"}
    print(f"{total:.2f}", abs(z), flags[total > 10])
"#;
