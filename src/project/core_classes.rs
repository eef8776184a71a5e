//! Predefined classes every sketch can see without a library.
//!
//! Covers the sketch runtime (`processing.*`) and the parts of `java.lang`,
//! `java.util` and `java.io` sketches commonly use. Classes whose member
//! list here is incomplete are marked [`partial`](ClassInfo::partial), so
//! the checker never reports a missing member on them.

use once_cell::sync::Lazy;

use super::classes::{ClassInfo, ClassKind, ClassTable};

/// Packages imported into every sketch, in lookup order.
pub const DEFAULT_IMPORTS: &[&str] = &[
    "processing.core",
    "processing.data",
    "processing.event",
    "processing.opengl",
    "java.util",
    "java.io",
];

/// The implicit top-level namespace of the base language.
pub const IMPLICIT_PACKAGE: &str = "java.lang";

/// Package prefixes that never need a classpath entry.
pub const PROVIDED_PREFIXES: &[&str] = &["java.", "javax.", "processing."];

static CORE: Lazy<ClassTable> = Lazy::new(|| {
    let mut table = ClassTable::new();
    for class in java_lang()
        .into_iter()
        .chain(java_util())
        .chain(java_io())
        .chain(processing_core())
        .chain(processing_data())
        .chain(processing_event())
        .chain(known_names())
    {
        table.insert(class);
    }
    tracing::debug!("[CLASSPATH] {} predefined classes", table.len());
    table
});

/// The shared predefined class table.
pub fn core_classes() -> &'static ClassTable {
    &CORE
}

/// Whether imports from `package` are satisfied without a library.
pub fn is_provided_package(package: &str) -> bool {
    PROVIDED_PREFIXES
        .iter()
        .any(|prefix| package.starts_with(prefix) || package == prefix.trim_end_matches('.'))
}

const OBJECT_METHODS: &[&str] = &[
    "boolean equals",
    "int hashCode",
    "String toString",
    "java.lang.Class getClass",
    "void notify",
    "void notifyAll",
    "void wait",
];

const COLLECTION_METHODS: &[&str] = &[
    "boolean add",
    "boolean addAll",
    "void clear",
    "boolean contains",
    "boolean containsAll",
    "boolean isEmpty",
    "java.util.Iterator iterator",
    "boolean remove",
    "boolean removeAll",
    "boolean removeIf",
    "boolean retainAll",
    "int size",
    "Object[] toArray",
    "java.util.stream.Stream stream",
    "void forEach",
];

const LIST_METHODS: &[&str] = &[
    "E get",
    "E set",
    "int indexOf",
    "int lastIndexOf",
    "java.util.List subList",
    "void sort",
    "java.util.ListIterator listIterator",
];

/// Drawing API shared by the sketch class and off-screen graphics.
const DRAWING_METHODS: &[&str] = &[
    "void background",
    "void fill",
    "void noFill",
    "void stroke",
    "void noStroke",
    "void strokeWeight",
    "void strokeCap",
    "void strokeJoin",
    "void tint",
    "void noTint",
    "void rect",
    "void square",
    "void ellipse",
    "void circle",
    "void arc",
    "void line",
    "void point",
    "void triangle",
    "void quad",
    "void bezier",
    "void bezierVertex",
    "void bezierDetail",
    "void curve",
    "void curveVertex",
    "void curveDetail",
    "void curveTightness",
    "void quadraticVertex",
    "void vertex",
    "void beginShape",
    "void endShape",
    "void beginContour",
    "void endContour",
    "void box",
    "void sphere",
    "void sphereDetail",
    "void text",
    "void textSize",
    "void textAlign",
    "void textFont",
    "void textLeading",
    "void textMode",
    "float textWidth",
    "float textAscent",
    "float textDescent",
    "void image",
    "void imageMode",
    "void rectMode",
    "void ellipseMode",
    "void shapeMode",
    "void shape",
    "void colorMode",
    "void blendMode",
    "void clip",
    "void noClip",
    "void translate",
    "void rotate",
    "void rotateX",
    "void rotateY",
    "void rotateZ",
    "void scale",
    "void shearX",
    "void shearY",
    "void pushMatrix",
    "void popMatrix",
    "void resetMatrix",
    "void applyMatrix",
    "void printMatrix",
    "void push",
    "void pop",
    "void pushStyle",
    "void popStyle",
    "void smooth",
    "void noSmooth",
    "void lights",
    "void noLights",
    "void ambientLight",
    "void directionalLight",
    "void pointLight",
    "void spotLight",
    "void lightFalloff",
    "void lightSpecular",
    "void ambient",
    "void emissive",
    "void specular",
    "void shininess",
    "void normal",
    "void texture",
    "void textureMode",
    "void textureWrap",
    "void camera",
    "void perspective",
    "void ortho",
    "void frustum",
    "void beginCamera",
    "void endCamera",
    "float screenX",
    "float screenY",
    "float screenZ",
    "float modelX",
    "float modelY",
    "float modelZ",
    "void hint",
    "void shader",
    "void resetShader",
    "processing.opengl.PShader loadShader",
    "processing.core.PShape createShape",
    "processing.core.PShape loadShape",
    "int color",
    "float red",
    "float green",
    "float blue",
    "float alpha",
    "float hue",
    "float saturation",
    "float brightness",
    "int lerpColor",
    "void clear",
];

fn java_lang() -> Vec<ClassInfo> {
    vec![
        ClassInfo::class("java.lang", "Object").with_methods(OBJECT_METHODS),
        ClassInfo::class("java.lang", "String")
            .with_interfaces(&["java.lang.CharSequence", "java.lang.Comparable"])
            .with_methods(&[
                "int length",
                "char charAt",
                "String substring",
                "int indexOf",
                "int lastIndexOf",
                "boolean equals",
                "boolean equalsIgnoreCase",
                "int compareTo",
                "int compareToIgnoreCase",
                "String toUpperCase",
                "String toLowerCase",
                "String trim",
                "String strip",
                "String[] split",
                "boolean startsWith",
                "boolean endsWith",
                "boolean contains",
                "String replace",
                "String replaceAll",
                "String replaceFirst",
                "boolean matches",
                "boolean isEmpty",
                "boolean isBlank",
                "char[] toCharArray",
                "byte[] getBytes",
                "String concat",
                "String repeat",
                "int codePointAt",
                "String intern",
                "static String valueOf",
                "static String format",
                "static String join",
            ])
            .with_methods(OBJECT_METHODS),
        ClassInfo::interface("java.lang", "CharSequence")
            .with_methods(&["int length", "char charAt", "CharSequence subSequence"]),
        ClassInfo::interface("java.lang", "Comparable").with_methods(&["int compareTo"]),
        ClassInfo::interface("java.lang", "Iterable")
            .with_methods(&["java.util.Iterator iterator", "void forEach"]),
        ClassInfo::interface("java.lang", "Runnable").with_methods(&["void run"]),
        ClassInfo::interface("java.lang", "Cloneable"),
        ClassInfo::interface("java.lang", "AutoCloseable").with_methods(&["void close"]),
        ClassInfo::class("java.lang", "Math")
            .with_fields(&["static double PI", "static double E"])
            .with_methods(&[
                "static double abs",
                "static double min",
                "static double max",
                "static double sqrt",
                "static double cbrt",
                "static double pow",
                "static double exp",
                "static double log",
                "static double log10",
                "static double sin",
                "static double cos",
                "static double tan",
                "static double asin",
                "static double acos",
                "static double atan",
                "static double atan2",
                "static double floor",
                "static double ceil",
                "static long round",
                "static double rint",
                "static double random",
                "static double signum",
                "static double hypot",
                "static double toRadians",
                "static double toDegrees",
                "static int floorDiv",
                "static int floorMod",
            ]),
        ClassInfo::class("java.lang", "Number")
            .with_methods(&[
                "int intValue",
                "long longValue",
                "float floatValue",
                "double doubleValue",
                "byte byteValue",
                "short shortValue",
            ]),
        ClassInfo::class("java.lang", "Integer")
            .with_superclass("java.lang.Number")
            .with_fields(&[
                "static int MAX_VALUE",
                "static int MIN_VALUE",
                "static int SIZE",
            ])
            .with_methods(&[
                "static int parseInt",
                "static Integer valueOf",
                "static String toString",
                "static String toHexString",
                "static String toBinaryString",
                "static int compare",
                "static int max",
                "static int min",
                "static int sum",
                "static int signum",
                "static int bitCount",
                "int compareTo",
            ]),
        ClassInfo::class("java.lang", "Long")
            .with_superclass("java.lang.Number")
            .with_fields(&["static long MAX_VALUE", "static long MIN_VALUE"])
            .with_methods(&[
                "static long parseLong",
                "static Long valueOf",
                "static String toString",
                "static int compare",
                "int compareTo",
            ]),
        ClassInfo::class("java.lang", "Float")
            .with_superclass("java.lang.Number")
            .with_fields(&[
                "static float MAX_VALUE",
                "static float MIN_VALUE",
                "static float POSITIVE_INFINITY",
                "static float NEGATIVE_INFINITY",
                "static float NaN",
            ])
            .with_methods(&[
                "static float parseFloat",
                "static Float valueOf",
                "static String toString",
                "static boolean isNaN",
                "static boolean isInfinite",
                "static int compare",
                "boolean isNaN",
                "int compareTo",
            ]),
        ClassInfo::class("java.lang", "Double")
            .with_superclass("java.lang.Number")
            .with_fields(&[
                "static double MAX_VALUE",
                "static double MIN_VALUE",
                "static double POSITIVE_INFINITY",
                "static double NEGATIVE_INFINITY",
                "static double NaN",
            ])
            .with_methods(&[
                "static double parseDouble",
                "static Double valueOf",
                "static String toString",
                "static boolean isNaN",
                "static int compare",
                "boolean isNaN",
                "int compareTo",
            ]),
        ClassInfo::class("java.lang", "Boolean")
            .with_fields(&["static Boolean TRUE", "static Boolean FALSE"])
            .with_methods(&[
                "static boolean parseBoolean",
                "static Boolean valueOf",
                "static String toString",
                "boolean booleanValue",
            ]),
        ClassInfo::class("java.lang", "Character")
            .with_methods(&[
                "static boolean isDigit",
                "static boolean isLetter",
                "static boolean isLetterOrDigit",
                "static boolean isWhitespace",
                "static boolean isUpperCase",
                "static boolean isLowerCase",
                "static char toUpperCase",
                "static char toLowerCase",
                "static int getNumericValue",
                "static Character valueOf",
                "static String toString",
                "char charValue",
            ]),
        ClassInfo::class("java.lang", "Byte").with_superclass("java.lang.Number").partial(),
        ClassInfo::class("java.lang", "Short").with_superclass("java.lang.Number").partial(),
        ClassInfo::class("java.lang", "StringBuilder")
            .with_interfaces(&["java.lang.CharSequence"])
            .with_methods(&[
                "StringBuilder append",
                "StringBuilder insert",
                "StringBuilder reverse",
                "StringBuilder delete",
                "StringBuilder deleteCharAt",
                "StringBuilder replace",
                "void setLength",
                "void setCharAt",
                "int indexOf",
                "String substring",
            ]),
        ClassInfo::class("java.lang", "System")
            .with_fields(&[
                "static java.io.PrintStream out",
                "static java.io.PrintStream err",
                "static java.io.InputStream in",
            ])
            .with_methods(&[
                "static long currentTimeMillis",
                "static long nanoTime",
                "static void arraycopy",
                "static void exit",
                "static void gc",
                "static String getProperty",
                "static String getenv",
                "static String lineSeparator",
                "static int identityHashCode",
            ]),
        ClassInfo::class("java.lang", "Thread")
            .with_interfaces(&["java.lang.Runnable"])
            .partial(),
        ClassInfo::class("java.lang", "Class").partial(),
        ClassInfo::class("java.lang", "Enum")
            .with_interfaces(&["java.lang.Comparable"])
            .with_methods(&["String name", "int ordinal", "int compareTo"]),
        ClassInfo::class("java.lang", "Throwable")
            .with_methods(&[
                "String getMessage",
                "String getLocalizedMessage",
                "Throwable getCause",
                "void printStackTrace",
                "StackTraceElement[] getStackTrace",
                "void addSuppressed",
            ]),
        ClassInfo::class("java.lang", "Exception").with_superclass("java.lang.Throwable"),
        ClassInfo::class("java.lang", "Error").with_superclass("java.lang.Throwable"),
        ClassInfo::class("java.lang", "RuntimeException").with_superclass("java.lang.Exception"),
        ClassInfo::class("java.lang", "InterruptedException").with_superclass("java.lang.Exception"),
        ClassInfo::class("java.lang", "IllegalArgumentException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "IllegalStateException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "NullPointerException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "NumberFormatException")
            .with_superclass("java.lang.IllegalArgumentException"),
        ClassInfo::class("java.lang", "ArithmeticException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "IndexOutOfBoundsException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "ArrayIndexOutOfBoundsException")
            .with_superclass("java.lang.IndexOutOfBoundsException"),
        ClassInfo::class("java.lang", "UnsupportedOperationException")
            .with_superclass("java.lang.RuntimeException"),
        ClassInfo::class("java.lang", "StackTraceElement").partial(),
    ]
}

fn java_util() -> Vec<ClassInfo> {
    vec![
        ClassInfo::interface("java.util", "Collection")
            .with_interfaces(&["java.lang.Iterable"])
            .with_methods(COLLECTION_METHODS),
        ClassInfo::interface("java.util", "List")
            .with_interfaces(&["java.util.Collection"])
            .with_methods(LIST_METHODS),
        ClassInfo::interface("java.util", "Set").with_interfaces(&["java.util.Collection"]),
        ClassInfo::interface("java.util", "Queue")
            .with_interfaces(&["java.util.Collection"])
            .with_methods(&["boolean offer", "E poll", "E peek", "E element"]),
        ClassInfo::interface("java.util", "Deque")
            .with_interfaces(&["java.util.Queue"])
            .with_methods(&[
                "void addFirst",
                "void addLast",
                "E removeFirst",
                "E removeLast",
                "E getFirst",
                "E getLast",
                "E peekFirst",
                "E peekLast",
                "E pollFirst",
                "E pollLast",
                "void push",
                "E pop",
            ]),
        ClassInfo::interface("java.util", "Map")
            .with_methods(&[
                "V put",
                "V get",
                "V getOrDefault",
                "V remove",
                "boolean containsKey",
                "boolean containsValue",
                "java.util.Set keySet",
                "java.util.Collection values",
                "java.util.Set entrySet",
                "int size",
                "boolean isEmpty",
                "void clear",
                "void putAll",
                "V putIfAbsent",
                "void forEach",
                "V merge",
                "V computeIfAbsent",
            ]),
        ClassInfo::interface("java.util", "Iterator")
            .with_methods(&["boolean hasNext", "E next", "void remove"]),
        ClassInfo::interface("java.util", "ListIterator")
            .with_interfaces(&["java.util.Iterator"])
            .partial(),
        ClassInfo::interface("java.util", "Comparator").with_methods(&["int compare"]).partial(),
        ClassInfo::class("java.util", "ArrayList")
            .with_interfaces(&["java.util.List"])
            .with_methods(&["void ensureCapacity", "void trimToSize"]),
        ClassInfo::class("java.util", "LinkedList")
            .with_interfaces(&["java.util.List", "java.util.Deque"]),
        ClassInfo::class("java.util", "ArrayDeque").with_interfaces(&["java.util.Deque"]),
        ClassInfo::class("java.util", "HashMap").with_interfaces(&["java.util.Map"]),
        ClassInfo::class("java.util", "LinkedHashMap").with_superclass("java.util.HashMap"),
        ClassInfo::class("java.util", "TreeMap").with_interfaces(&["java.util.Map"]).partial(),
        ClassInfo::class("java.util", "HashSet").with_interfaces(&["java.util.Set"]),
        ClassInfo::class("java.util", "LinkedHashSet").with_superclass("java.util.HashSet"),
        ClassInfo::class("java.util", "TreeSet").with_interfaces(&["java.util.Set"]).partial(),
        ClassInfo::class("java.util", "PriorityQueue").with_interfaces(&["java.util.Queue"]),
        ClassInfo::class("java.util", "Collections")
            .with_methods(&[
                "static void sort",
                "static void shuffle",
                "static void reverse",
                "static void swap",
                "static T max",
                "static T min",
                "static java.util.List emptyList",
                "static java.util.List unmodifiableList",
                "static java.util.List synchronizedList",
                "static int frequency",
                "static void fill",
                "static boolean addAll",
            ]),
        ClassInfo::class("java.util", "Arrays")
            .with_methods(&[
                "static void sort",
                "static void fill",
                "static java.util.List asList",
                "static String toString",
                "static String deepToString",
                "static boolean equals",
                "static T[] copyOf",
                "static T[] copyOfRange",
                "static int binarySearch",
                "static java.util.stream.Stream stream",
                "static int hashCode",
            ]),
        ClassInfo::class("java.util", "Random")
            .with_methods(&[
                "int nextInt",
                "float nextFloat",
                "double nextDouble",
                "long nextLong",
                "boolean nextBoolean",
                "double nextGaussian",
                "void setSeed",
                "void nextBytes",
            ]),
        ClassInfo::class("java.util", "Scanner").with_interfaces(&["java.util.Iterator"]).partial(),
        ClassInfo::class("java.util", "Date").partial(),
        ClassInfo::class("java.util", "Calendar").partial(),
        ClassInfo::class("java.util", "Objects")
            .with_methods(&[
                "static boolean equals",
                "static int hash",
                "static int hashCode",
                "static T requireNonNull",
                "static boolean isNull",
                "static boolean nonNull",
                "static String toString",
            ]),
        ClassInfo::class("java.util", "Optional").partial(),
    ]
}

fn java_io() -> Vec<ClassInfo> {
    vec![
        ClassInfo::interface("java.io", "Serializable"),
        ClassInfo::interface("java.io", "Closeable")
            .with_interfaces(&["java.lang.AutoCloseable"])
            .with_methods(&["void close"]),
        ClassInfo::class("java.io", "PrintStream")
            .with_methods(&[
                "void println",
                "void print",
                "java.io.PrintStream printf",
                "java.io.PrintStream format",
                "void flush",
                "void close",
                "void write",
            ]),
        ClassInfo::class("java.io", "PrintWriter")
            .with_methods(&[
                "void println",
                "void print",
                "java.io.PrintWriter printf",
                "java.io.PrintWriter format",
                "void flush",
                "void close",
                "void write",
                "boolean checkError",
            ]),
        ClassInfo::class("java.io", "BufferedReader")
            .with_interfaces(&["java.io.Closeable"])
            .with_methods(&[
                "String readLine",
                "int read",
                "boolean ready",
                "void close",
                "java.util.stream.Stream lines",
            ]),
        ClassInfo::class("java.io", "File")
            .with_fields(&["static String separator"])
            .with_methods(&[
                "String getName",
                "String getPath",
                "String getAbsolutePath",
                "String getParent",
                "java.io.File getParentFile",
                "boolean exists",
                "boolean isDirectory",
                "boolean isFile",
                "boolean delete",
                "boolean mkdir",
                "boolean mkdirs",
                "long length",
                "long lastModified",
                "String[] list",
                "java.io.File[] listFiles",
                "boolean canRead",
                "boolean canWrite",
                "boolean renameTo",
            ]),
        ClassInfo::class("java.io", "InputStream").partial(),
        ClassInfo::class("java.io", "OutputStream").partial(),
        ClassInfo::class("java.io", "Reader").partial(),
        ClassInfo::class("java.io", "Writer").partial(),
        ClassInfo::class("java.io", "IOException").with_superclass("java.lang.Exception"),
        ClassInfo::class("java.io", "FileNotFoundException")
            .with_superclass("java.io.IOException"),
    ]
}

fn processing_core() -> Vec<ClassInfo> {
    vec![
        ClassInfo::interface("processing.core", "PConstants").with_fields(&[
            "static float PI",
            "static float HALF_PI",
            "static float THIRD_PI",
            "static float QUARTER_PI",
            "static float TWO_PI",
            "static float TAU",
            "static float DEG_TO_RAD",
            "static float RAD_TO_DEG",
            "static String P2D",
            "static String P3D",
            "static String JAVA2D",
            "static String FX2D",
            "static String PDF",
            "static String SVG",
            "static int RGB",
            "static int ARGB",
            "static int HSB",
            "static int ALPHA",
            "static int CORNER",
            "static int CORNERS",
            "static int CENTER",
            "static int RADIUS",
            "static int LEFT",
            "static int RIGHT",
            "static int UP",
            "static int DOWN",
            "static int TOP",
            "static int BOTTOM",
            "static int BASELINE",
            "static int CLOSE",
            "static int OPEN",
            "static int CHORD",
            "static int PIE",
            "static int POINTS",
            "static int LINES",
            "static int TRIANGLES",
            "static int TRIANGLE_STRIP",
            "static int TRIANGLE_FAN",
            "static int QUADS",
            "static int QUAD_STRIP",
            "static int POLYGON",
            "static int SQUARE",
            "static int ROUND",
            "static int PROJECT",
            "static int MITER",
            "static int BEVEL",
            "static int BLEND",
            "static int ADD",
            "static int SUBTRACT",
            "static int LIGHTEST",
            "static int DARKEST",
            "static int DIFFERENCE",
            "static int EXCLUSION",
            "static int MULTIPLY",
            "static int SCREEN",
            "static int REPLACE",
            "static int GRAY",
            "static int THRESHOLD",
            "static int INVERT",
            "static int OPAQUE",
            "static int POSTERIZE",
            "static int BLUR",
            "static int ERODE",
            "static int DILATE",
            "static int ARROW",
            "static int CROSS",
            "static int HAND",
            "static int MOVE",
            "static int TEXT",
            "static int WAIT",
            "static int IMAGE",
            "static int MODEL",
            "static int SHAPE",
            "static int NORMAL",
            "static int CLAMP",
            "static int REPEAT",
            "static char CODED",
            "static char BACKSPACE",
            "static char TAB",
            "static char ENTER",
            "static char RETURN",
            "static char ESC",
            "static char DELETE",
            "static int SHIFT",
            "static int CONTROL",
            "static int ALT",
        ]),
        ClassInfo::class("processing.core", "PApplet")
            .with_interfaces(&["processing.core.PConstants"])
            .with_fields(&[
                "int width",
                "int height",
                "int pixelWidth",
                "int pixelHeight",
                "int displayWidth",
                "int displayHeight",
                "int mouseX",
                "int mouseY",
                "int pmouseX",
                "int pmouseY",
                "int mouseButton",
                "boolean mousePressed",
                "char key",
                "int keyCode",
                "boolean keyPressed",
                "int frameCount",
                "float frameRate",
                "boolean focused",
                "int[] pixels",
                "String[] args",
                "processing.core.PGraphics g",
                "boolean finished",
            ])
            .with_methods(DRAWING_METHODS)
            .with_methods(&[
                "void settings",
                "void setup",
                "void draw",
                "void size",
                "void fullScreen",
                "void pixelDensity",
                "int displayDensity",
                "void frameRate",
                "void loop",
                "void noLoop",
                "boolean isLooping",
                "void redraw",
                "void exit",
                "void delay",
                "void cursor",
                "void noCursor",
                "void mousePressed",
                "void mouseReleased",
                "void mouseClicked",
                "void mouseMoved",
                "void mouseDragged",
                "void mouseWheel",
                "void keyPressed",
                "void keyReleased",
                "void keyTyped",
                "void windowMoved",
                "void windowResized",
                "void thread",
                "void loadPixels",
                "void updatePixels",
                "int get",
                "void set",
                "void filter",
                "void copy",
                "void blend",
                "void save",
                "void saveFrame",
                "processing.core.PImage loadImage",
                "processing.core.PImage requestImage",
                "processing.core.PImage createImage",
                "processing.core.PGraphics createGraphics",
                "processing.core.PFont loadFont",
                "processing.core.PFont createFont",
                "String[] loadStrings",
                "byte[] loadBytes",
                "void saveStrings",
                "void saveBytes",
                "processing.data.Table loadTable",
                "void saveTable",
                "processing.data.JSONObject loadJSONObject",
                "processing.data.JSONArray loadJSONArray",
                "processing.data.JSONObject parseJSONObject",
                "processing.data.JSONArray parseJSONArray",
                "void saveJSONObject",
                "void saveJSONArray",
                "processing.data.XML loadXML",
                "processing.data.XML parseXML",
                "java.io.BufferedReader createReader",
                "java.io.PrintWriter createWriter",
                "java.io.InputStream createInput",
                "java.io.OutputStream createOutput",
                "String sketchPath",
                "String dataPath",
                "java.io.File sketchFile",
                "java.io.File dataFile",
                "void selectInput",
                "void selectOutput",
                "void selectFolder",
                "void launch",
                "void link",
                "void registerMethod",
                "void unregisterMethod",
                "void surfaceSetTitle",
                "processing.core.PSurface getSurface",
                "static int millis",
                "static int second",
                "static int minute",
                "static int hour",
                "static int day",
                "static int month",
                "static int year",
                "float random",
                "float randomGaussian",
                "void randomSeed",
                "float noise",
                "void noiseSeed",
                "void noiseDetail",
                "static float map",
                "static float constrain",
                "static float lerp",
                "static float norm",
                "static float dist",
                "static float mag",
                "static float sq",
                "static float sqrt",
                "static float pow",
                "static float exp",
                "static float log",
                "static float abs",
                "static float min",
                "static float max",
                "static int floor",
                "static int ceil",
                "static int round",
                "static float sin",
                "static float cos",
                "static float tan",
                "static float asin",
                "static float acos",
                "static float atan",
                "static float atan2",
                "static float radians",
                "static float degrees",
                "static void println",
                "static void print",
                "static void printArray",
                "static void debug",
                "static String str",
                "static String nf",
                "static String nfc",
                "static String nfp",
                "static String nfs",
                "static String hex",
                "static int unhex",
                "static String binary",
                "static int unbinary",
                "static String join",
                "static String[] split",
                "static String[] splitTokens",
                "static String trim",
                "static String[] match",
                "static String[][] matchAll",
                "static Object append",
                "static Object shorten",
                "static Object expand",
                "static Object concat",
                "static Object subset",
                "static Object splice",
                "static Object sort",
                "static Object reverse",
                "static void arrayCopy",
                "static int parseInt",
                "static float parseFloat",
                "static boolean parseBoolean",
                "static char parseChar",
                "static byte parseByte",
                "static void main",
                "static void runSketch",
            ])
            .with_methods(OBJECT_METHODS),
        ClassInfo::class("processing.core", "PVector")
            .with_interfaces(&["java.io.Serializable"])
            .with_fields(&["float x", "float y", "float z"])
            .with_methods(&[
                "PVector set",
                "PVector copy",
                "PVector get",
                "float mag",
                "float magSq",
                "PVector add",
                "PVector sub",
                "PVector mult",
                "PVector div",
                "float dist",
                "float dot",
                "PVector cross",
                "PVector normalize",
                "PVector limit",
                "PVector setMag",
                "float heading",
                "PVector setHeading",
                "PVector rotate",
                "PVector lerp",
                "float[] array",
                "static PVector random2D",
                "static PVector random3D",
                "static PVector fromAngle",
                "static float angleBetween",
            ])
            .with_methods(OBJECT_METHODS),
        ClassInfo::class("processing.core", "PImage")
            .with_interfaces(&["processing.core.PConstants", "java.lang.Cloneable"])
            .with_fields(&[
                "int width",
                "int height",
                "int pixelWidth",
                "int pixelHeight",
                "int pixelDensity",
                "int format",
                "int[] pixels",
            ])
            .with_methods(&[
                "void loadPixels",
                "void updatePixels",
                "void resize",
                "int get",
                "void set",
                "void mask",
                "void filter",
                "void copy",
                "void blend",
                "boolean save",
                "boolean isLoaded",
                "Object getNative",
            ])
            .with_methods(OBJECT_METHODS),
        ClassInfo::class("processing.core", "PGraphics")
            .with_superclass("processing.core.PImage")
            .with_methods(DRAWING_METHODS)
            .with_methods(&[
                "void beginDraw",
                "void endDraw",
                "void setSize",
                "void dispose",
                "boolean is2D",
                "boolean is3D",
            ]),
        ClassInfo::class("processing.core", "PFont")
            .with_interfaces(&["processing.core.PConstants"])
            .with_methods(&[
                "String getName",
                "String getPostScriptName",
                "float getSize",
                "int getDefaultSize",
                "float ascent",
                "float descent",
                "float width",
                "static String[] list",
            ])
            .with_methods(OBJECT_METHODS),
        ClassInfo::class("processing.core", "PShape")
            .with_interfaces(&["processing.core.PConstants"])
            .with_fields(&["float width", "float height", "float depth"])
            .partial(),
        ClassInfo::interface("processing.core", "PSurface").partial(),
        ClassInfo::class("processing.core", "PMatrix2D").partial(),
        ClassInfo::class("processing.core", "PMatrix3D").partial(),
        ClassInfo::class("processing.opengl", "PShader").partial(),
        ClassInfo::class("processing.opengl", "PGraphicsOpenGL")
            .with_superclass("processing.core.PGraphics")
            .partial(),
    ]
}

fn processing_data() -> Vec<ClassInfo> {
    const LIST: &[&str] = &[
        "int size",
        "void clear",
        "void resize",
        "void remove",
        "void sort",
        "void sortReverse",
        "void reverse",
        "void shuffle",
        "boolean hasValue",
        "void print",
        "String join",
    ];
    vec![
        ClassInfo::class("processing.data", "IntList")
            .with_methods(LIST)
            .with_methods(&[
                "int get",
                "void set",
                "void append",
                "void add",
                "void sub",
                "void mult",
                "void div",
                "void increment",
                "int min",
                "int max",
                "long sum",
                "int[] array",
                "int[] values",
                "processing.data.IntList copy",
            ]),
        ClassInfo::class("processing.data", "FloatList")
            .with_methods(LIST)
            .with_methods(&[
                "float get",
                "void set",
                "void append",
                "void add",
                "void sub",
                "void mult",
                "void div",
                "float min",
                "float max",
                "double sum",
                "float[] array",
                "float[] values",
                "processing.data.FloatList copy",
            ]),
        ClassInfo::class("processing.data", "StringList")
            .with_methods(LIST)
            .with_methods(&[
                "String get",
                "void set",
                "void append",
                "void upper",
                "void lower",
                "String[] array",
                "String[] values",
                "processing.data.StringList copy",
            ]),
        ClassInfo::class("processing.data", "IntDict").partial(),
        ClassInfo::class("processing.data", "FloatDict").partial(),
        ClassInfo::class("processing.data", "StringDict").partial(),
        ClassInfo::class("processing.data", "Table")
            .with_methods(&[
                "processing.data.TableRow addRow",
                "void removeRow",
                "void clearRows",
                "processing.data.TableRow getRow",
                "java.lang.Iterable rows",
                "int getRowCount",
                "int getColumnCount",
                "void addColumn",
                "void removeColumn",
                "String[] getColumnTitles",
                "int getInt",
                "float getFloat",
                "String getString",
                "void setInt",
                "void setFloat",
                "void setString",
                "processing.data.TableRow findRow",
                "java.lang.Iterable findRows",
                "processing.data.TableRow matchRow",
                "java.lang.Iterable matchRows",
                "void trim",
                "void sort",
                "void sortReverse",
            ]),
        ClassInfo::interface("processing.data", "TableRow")
            .with_methods(&[
                "int getInt",
                "float getFloat",
                "long getLong",
                "double getDouble",
                "String getString",
                "void setInt",
                "void setFloat",
                "void setLong",
                "void setDouble",
                "void setString",
                "int getColumnCount",
                "String getColumnTitle",
            ]),
        ClassInfo::class("processing.data", "JSONObject")
            .with_methods(&[
                "int getInt",
                "float getFloat",
                "long getLong",
                "double getDouble",
                "boolean getBoolean",
                "String getString",
                "processing.data.JSONObject getJSONObject",
                "processing.data.JSONArray getJSONArray",
                "processing.data.JSONObject setInt",
                "processing.data.JSONObject setFloat",
                "processing.data.JSONObject setBoolean",
                "processing.data.JSONObject setString",
                "processing.data.JSONObject setJSONObject",
                "processing.data.JSONObject setJSONArray",
                "boolean hasKey",
                "boolean isNull",
                "java.util.Set keys",
                "int size",
                "processing.data.JSONObject remove",
                "boolean save",
                "String format",
            ]),
        ClassInfo::class("processing.data", "JSONArray")
            .with_methods(&[
                "int size",
                "int getInt",
                "float getFloat",
                "boolean getBoolean",
                "String getString",
                "processing.data.JSONObject getJSONObject",
                "processing.data.JSONArray getJSONArray",
                "processing.data.JSONArray append",
                "processing.data.JSONArray setInt",
                "processing.data.JSONArray setFloat",
                "processing.data.JSONArray setString",
                "processing.data.JSONArray setJSONObject",
                "int[] getIntArray",
                "String[] getStringArray",
                "Object remove",
                "boolean isNull",
                "boolean save",
                "String format",
            ]),
        ClassInfo::class("processing.data", "XML")
            .with_interfaces(&["java.io.Serializable"])
            .with_methods(&[
                "String getName",
                "void setName",
                "processing.data.XML getParent",
                "processing.data.XML getChild",
                "processing.data.XML[] getChildren",
                "int getChildCount",
                "boolean hasChildren",
                "processing.data.XML addChild",
                "void removeChild",
                "String[] listChildren",
                "String[] listAttributes",
                "boolean hasAttribute",
                "String getString",
                "int getInt",
                "float getFloat",
                "void setString",
                "void setInt",
                "void setFloat",
                "String getContent",
                "int getIntContent",
                "float getFloatContent",
                "void setContent",
                "String format",
            ]),
    ]
}

fn processing_event() -> Vec<ClassInfo> {
    const EVENT: &[&str] = &[
        "Object getNative",
        "long getMillis",
        "int getAction",
        "int getModifiers",
        "boolean isShiftDown",
        "boolean isControlDown",
        "boolean isMetaDown",
        "boolean isAltDown",
    ];
    vec![
        ClassInfo::class("processing.event", "Event").with_methods(EVENT),
        ClassInfo::class("processing.event", "MouseEvent")
            .with_superclass("processing.event.Event")
            .with_fields(&[
                "static int PRESS",
                "static int RELEASE",
                "static int CLICK",
                "static int DRAG",
                "static int MOVE",
                "static int ENTER",
                "static int EXIT",
                "static int WHEEL",
            ])
            .with_methods(&["int getX", "int getY", "int getButton", "int getCount"]),
        ClassInfo::class("processing.event", "KeyEvent")
            .with_superclass("processing.event.Event")
            .with_fields(&["static int PRESS", "static int RELEASE", "static int TYPE"])
            .with_methods(&["char getKey", "int getKeyCode", "boolean isAutoRepeat"]),
        ClassInfo::class("processing.event", "TouchEvent")
            .with_superclass("processing.event.Event")
            .partial(),
    ]
}

/// Further classes of the default packages, known by name only.
const NAME_ONLY: &[(&str, &[&str])] = &[
    (
        "java.lang",
        &[
            "Runnable", "Thread", "Iterable", "AutoCloseable", "Cloneable", "Comparable",
            "CharSequence", "Number", "Void", "Process", "Runtime", "ThreadLocal",
            "InterruptedException", "IllegalArgumentException", "IllegalStateException",
            "NullPointerException", "IndexOutOfBoundsException",
            "ArrayIndexOutOfBoundsException", "NumberFormatException", "ClassCastException",
            "ArithmeticException", "UnsupportedOperationException", "Error", "Exception",
            "RuntimeException", "Throwable", "Override", "Deprecated", "SuppressWarnings",
            "FunctionalInterface", "SafeVarargs", "StringBuffer", "Enum", "Record",
        ],
    ),
    (
        "java.util",
        &[
            "AbstractList", "AbstractMap", "ArrayDeque", "BitSet", "Deque", "Dictionary",
            "EnumMap", "EnumSet", "Enumeration", "EventListener", "Hashtable",
            "IdentityHashMap", "LinkedList", "ListIterator", "Locale", "NavigableMap",
            "NavigableSet", "NoSuchElementException", "Properties", "Random",
            "SortedMap", "SortedSet", "Stack", "StringJoiner", "StringTokenizer", "Timer",
            "TimerTask", "UUID", "Vector", "WeakHashMap", "ConcurrentModificationException",
            "Spliterator", "OptionalInt", "OptionalDouble", "Formatter", "Base64",
        ],
    ),
    (
        "java.io",
        &[
            "BufferedInputStream", "BufferedOutputStream", "BufferedWriter",
            "ByteArrayInputStream", "ByteArrayOutputStream", "Closeable", "DataInputStream",
            "DataOutputStream", "EOFException", "FileInputStream", "FileNotFoundException",
            "FileOutputStream", "FileReader", "FileWriter", "FilenameFilter", "InputStreamReader",
            "ObjectInputStream", "ObjectOutputStream", "OutputStreamWriter", "Serializable",
            "StringReader", "StringWriter", "UncheckedIOException", "Console",
        ],
    ),
    (
        "processing.core",
        &["PStyle", "PMatrix", "PShapeSVG", "PShapeOBJ", "PImageAWT", "ThinkDifferent"],
    ),
    (
        "processing.data",
        &["Sort", "DoubleDict", "DoubleList", "LongDict", "LongList", "TableRow"],
    ),
    ("processing.opengl", &["PGraphicsOpenGL", "PGL", "PJOGL", "PGraphics2D", "PGraphics3D"]),
];

fn known_names() -> Vec<ClassInfo> {
    NAME_ONLY
        .iter()
        .flat_map(|(package, names)| names.iter().map(|name| ClassInfo::opaque(package, name)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ClassLookup;

    #[test]
    fn test_sketch_base_class_members() {
        let applet = core_classes().class("processing.core.PApplet").unwrap();
        assert!(applet.members_known);
        assert!(applet.field("mouseX").is_some());
        assert!(applet.method("ellipse").is_some());
        assert!(applet.method("parseInt").unwrap().is_static);
        assert_eq!(
            applet.interfaces.first().map(|i| i.as_str()),
            Some("processing.core.PConstants")
        );
    }

    #[test]
    fn test_default_packages_are_present() {
        let core = core_classes();
        for package in DEFAULT_IMPORTS.iter().chain([&IMPLICIT_PACKAGE]) {
            assert!(core.has_package(package), "{package}");
        }
        assert!(core.has_package("java"));
    }

    #[test]
    fn test_provided_packages() {
        assert!(is_provided_package("java.awt"));
        assert!(is_provided_package("processing.sound"));
        assert!(!is_provided_package("javafx.scene"));
        assert!(!is_provided_package("toxi.geom"));
    }

    #[test]
    fn test_kinds() {
        let core = core_classes();
        assert_eq!(
            core.class("java.util.List").unwrap().kind,
            ClassKind::Interface
        );
        assert_eq!(
            core.class("java.util.ArrayList").unwrap().superclass.as_deref(),
            Some("java.lang.Object")
        );
    }
}
